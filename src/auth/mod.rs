use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::ApiError;

/// Community summary embedded in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityClaims {
    pub uid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    pub uid: Uuid,
    pub nickname: String,
    #[serde(default)]
    pub community: Option<CommunityClaims>,
    #[serde(default)]
    pub steam_id: Option<String>,
}

/// JWT payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: UserClaims,
    pub permissions: Vec<String>,
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(config: &JwtConfig, user: UserClaims, permissions: Vec<String>) -> Self {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(config.expires_in_secs).unwrap_or(i64::MAX);

        Self {
            sub: user.uid.to_string(),
            user,
            permissions,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now,
            exp: now.saturating_add(lifetime),
        }
    }
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Invalid JWT payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

/// Sign `claims` with the first configured algorithm
pub fn encode_claims(config: &JwtConfig, claims: &Claims) -> Result<String, JwtError> {
    if config.secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let algorithm = config.algorithms.first().copied().unwrap_or(Algorithm::HS256);
    let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());

    encode(&Header::new(algorithm), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn generate_jwt(
    config: &JwtConfig,
    user: UserClaims,
    permissions: Vec<String>,
) -> Result<String, JwtError> {
    encode_claims(config, &Claims::new(config, user, permissions))
}

/// Verify signature, algorithm, audience, issuer and expiry, then decode the payload
pub fn validate_jwt(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    if config.secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let algorithm = config.algorithms.first().copied().unwrap_or(Algorithm::HS256);
    let mut validation = Validation::new(algorithm);
    validation.algorithms = config.algorithms.clone();
    validation.set_audience(&[&config.audience]);
    validation.set_issuer(&[&config.issuer]);
    validation.validate_exp = true;

    let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                JwtError::InvalidPayload(e.to_string())
            }
            _ => JwtError::Invalid(e.to_string()),
        })
}

/// Authenticated user context extracted from JWT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: UserClaims,
    pub permissions: Vec<String>,
}

impl From<Claims> for Credentials {
    fn from(claims: Claims) -> Self {
        Self {
            user: claims.user,
            permissions: claims.permissions,
        }
    }
}

/// Caller of the current request, inserted by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated(Credentials),
}

impl Principal {
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(credentials) => Some(credentials),
        }
    }

    /// Granted permission strings, `None` when anonymous
    pub fn permissions(&self) -> Option<&[String]> {
        self.credentials().map(|c| c.permissions.as_slice())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .and_then(Principal::credentials)
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn user() -> UserClaims {
        UserClaims {
            uid: Uuid::new_v4(),
            nickname: "MorpheusXAUT".to_string(),
            community: None,
            steam_id: Some("76561198000000000".to_string()),
        }
    }

    #[test]
    fn token_round_trip_keeps_permissions() {
        let config = AppConfig::development().jwt;
        let user = user();
        let token = generate_jwt(&config, user.clone(), vec!["community.abc.leader".into()]).unwrap();

        let claims = validate_jwt(&config, &token).unwrap();
        assert_eq!(claims.user, user);
        assert_eq!(claims.sub, user.uid.to_string());
        assert_eq!(claims.permissions, vec!["community.abc.leader".to_string()]);
    }

    #[test]
    fn rejects_wrong_secret_and_audience() {
        let config = AppConfig::development().jwt;
        let token = generate_jwt(&config, user(), vec![]).unwrap();

        let mut other_secret = config.clone();
        other_secret.secret = "another-secret".to_string();
        assert!(matches!(validate_jwt(&other_secret, &token), Err(JwtError::Invalid(_))));

        let mut other_audience = config.clone();
        other_audience.audience = "someone-else".to_string();
        assert!(matches!(validate_jwt(&other_audience, &token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let config = AppConfig::development().jwt;
        let mut claims = Claims::new(&config, user(), vec![]);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = encode_claims(&config, &claims).unwrap();

        assert!(matches!(validate_jwt(&config, &token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn rejects_payload_without_user() {
        let config = AppConfig::development().jwt;
        let now = Utc::now().timestamp();
        let payload = serde_json::json!({
            "permissions": [],
            "sub": "x",
            "iss": config.issuer,
            "aud": config.audience,
            "iat": now,
            "exp": now + 600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(validate_jwt(&config, &token), Err(JwtError::InvalidPayload(_))));
    }

    #[test]
    fn huge_lifetime_saturates_expiry() {
        let mut config = AppConfig::development().jwt;
        config.expires_in_secs = u64::MAX;
        let claims = Claims::new(&config, user(), vec![]);
        assert_eq!(claims.exp, i64::MAX);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let mut config = AppConfig::development().jwt;
        config.secret.clear();
        assert!(matches!(generate_jwt(&config, user(), vec![]), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn principal_exposes_permissions() {
        assert_eq!(Principal::Anonymous.permissions(), None);
        let principal = Principal::Authenticated(Credentials {
            user: user(),
            permissions: vec!["admin.user".into()],
        });
        assert_eq!(principal.permissions(), Some(&["admin.user".to_string()][..]));
    }
}
