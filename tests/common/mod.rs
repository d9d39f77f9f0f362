#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use slotlist_api::auth::{generate_jwt, UserClaims};
use slotlist_api::config::AppConfig;
use slotlist_api::notifications::InMemoryNotificationStore;
use slotlist_api::{build_router, AppState};
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryNotificationStore>,
}

pub fn test_config() -> AppConfig {
    AppConfig::development()
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryNotificationStore::new());
    let state = AppState::new(test_config(), store.clone());
    let router = build_router(state.clone()).expect("route table");
    TestApp {
        router,
        state,
        store,
    }
}

pub fn test_user(nickname: &str) -> UserClaims {
    UserClaims {
        uid: Uuid::new_v4(),
        nickname: nickname.to_string(),
        community: None,
        steam_id: None,
    }
}

/// Signed token for `user` holding `permissions`
pub fn token_for(user: &UserClaims, permissions: &[&str]) -> String {
    generate_jwt(
        &test_config().jwt,
        user.clone(),
        permissions.iter().map(|p| p.to_string()).collect(),
    )
    .expect("token")
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
