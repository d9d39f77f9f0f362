// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Handlers take a `Credentials` extractor, anonymous callers get 401.

pub mod auth;
pub mod notifications;

pub use auth::get_permissions;
pub use notifications::{get_notification_list, get_unseen_notification_count};
