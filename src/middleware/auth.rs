use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, Credentials, Principal};
use crate::error::ApiError;

/// JWT authentication middleware.
///
/// Requests without an `Authorization` header continue as [`Principal::Anonymous`];
/// routes decide for themselves whether that is enough. A header that is present
/// but malformed, or carries an invalid token, is rejected with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)? {
        None => Principal::Anonymous,
        Some(token) => {
            let claims = validate_jwt(&state.config.jwt, &token).map_err(|e| {
                tracing::warn!("Rejected JWT for {} {}: {}", request.method(), request.uri().path(), e);
                ApiError::from(e)
            })?;

            tracing::debug!("Authenticated user {} ({})", claims.user.nickname, claims.user.uid);
            Principal::Authenticated(Credentials::from(claims))
        }
    };

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header, `None` when the header is absent
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(Some(token.trim().to_string()))
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
