// handlers/elevated/mod.rs - Elevated handlers (JWT authentication + route ACL)
//
// Every route here is registered with an `AclConfig`; `check_acl` has already
// granted access by the time a handler runs.

pub mod notifications;

pub use notifications::{create_community_notifications, create_notifications};
