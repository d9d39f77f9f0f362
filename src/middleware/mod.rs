pub mod acl;
pub mod auth;
pub mod headers;
pub mod real_ip;
pub mod response;

pub use acl::check_acl;
pub use auth::authenticate;
pub use headers::security_headers;
pub use real_ip::{real_ip, ClientAddr};
pub use response::{ApiResponse, ApiResult};
