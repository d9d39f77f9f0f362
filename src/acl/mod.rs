//! Hierarchical permission checks.
//!
//! Principals carry flat permission strings (`community.abc.leader`,
//! `admin.*`). They are parsed per request into a [`PermissionTree`] and
//! matched against the permissions a route declares in its [`AclConfig`].

pub mod policy;
pub mod template;
pub mod tree;

pub use policy::{evaluate, is_super_admin, AclConfig, AclDecision, RouteError, SUPER_ADMIN};
pub use template::substitute;
pub use tree::{find_permission, parse_permissions, PermissionNode, PermissionTree, WILDCARD};
