pub mod acl;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod notifications;

pub use app::{build_router, AppState};
