// handlers/protected/auth.rs - GET /v1/auth/permissions handler

use serde::Serialize;

use crate::acl::{is_super_admin, parse_permissions};
use crate::auth::{Credentials, UserClaims};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsResponse {
    pub user: UserClaims,
    pub permissions: Vec<String>,
    pub super_admin: bool,
}

/// GET /v1/auth/permissions - the caller's user and granted permissions
pub async fn get_permissions(credentials: Credentials) -> ApiResult<PermissionsResponse> {
    let tree = parse_permissions(&credentials.permissions);

    Ok(ApiResponse::success(PermissionsResponse {
        super_admin: is_super_admin(&tree),
        user: credentials.user,
        permissions: credentials.permissions,
    }))
}
