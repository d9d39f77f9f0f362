use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use crate::acl::{evaluate, AclConfig, AclDecision};
use crate::auth::Principal;
use crate::error::ApiError;

use super::real_ip::ClientAddr;

/// Route-layer middleware enforcing the route's [`AclConfig`].
///
/// Runs after routing, so path parameters are available for `{{param}}`
/// substitution, and after `authenticate`, which provides the [`Principal`].
pub async fn check_acl(
    State(acl): State<Arc<AclConfig>>,
    params: Option<Path<HashMap<String, String>>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let params = params.map(|Path(params)| params).unwrap_or_default();
    let principal = request
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or(Principal::Anonymous);
    let path = request.uri().path().to_string();

    tracing::debug!(
        "Checking ACL for {} (permissions: {:?}, strict: {})",
        path,
        acl.permissions,
        acl.strict
    );

    let decision = evaluate(&acl, principal.permissions(), &params);

    match (&decision, principal.credentials()) {
        (AclDecision::Allow, Some(credentials)) => {
            tracing::debug!("User {} allowed on {}", credentials.user.uid, path);
        }
        (AclDecision::Allow, None) => {
            tracing::debug!("Required permissions are empty, allowing {}", path);
        }
        (AclDecision::Unauthorized, _) => {
            tracing::debug!("User is not authenticated, rejecting {}", path);
        }
        (AclDecision::Forbidden, credentials) => {
            let client = request
                .extensions()
                .get::<ClientAddr>()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string());
            tracing::info!(
                "User {} from {} tried to access {} without permission (required: {:?}, strict: {})",
                credentials.map(|c| c.user.uid.to_string()).unwrap_or_default(),
                client,
                path,
                acl.required_permissions(&params),
                acl.strict
            );
        }
    }

    if let Some(err) = ApiError::from_decision(decision) {
        return Err(err);
    }

    Ok(next.run(request).await)
}
