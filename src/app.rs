//! HTTP application wiring.
//!
//! Builds the axum router, attaches per-route ACL requirements and the global
//! middleware stack, and defines the state shared by handlers.

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::acl::{AclConfig, RouteError};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{authenticate, check_acl, real_ip, security_headers, ClientAddr};
use crate::notifications::NotificationStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub notifications: Arc<dyn NotificationStore>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, notifications: Arc<dyn NotificationStore>) -> Self {
        Self {
            config: Arc::new(config),
            notifications,
            started_at: Utc::now(),
        }
    }
}

/// Route table under construction; ACL-guarded routes are validated as they are added
struct Routes {
    router: Router<AppState>,
}

impl Routes {
    fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    fn route(mut self, path: &str, method_router: MethodRouter<AppState>) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Add a route that only runs once `acl` grants access
    fn guarded(
        mut self,
        path: &str,
        acl: AclConfig,
        method_router: MethodRouter<AppState>,
    ) -> Result<Self, RouteError> {
        acl.validate_for_path(path)?;
        tracing::debug!(
            "Registering {} with ACL {:?} (strict: {})",
            path,
            acl.permissions,
            acl.strict
        );

        let guarded = method_router.route_layer(middleware::from_fn_with_state(
            Arc::new(acl),
            check_acl,
        ));
        self.router = self.router.route(path, guarded);
        Ok(self)
    }
}

pub fn build_router(state: AppState) -> Result<Router, RouteError> {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let client = request
            .extensions()
            .get::<ClientAddr>()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        tracing::debug_span!(
            "http.request",
            method = %request.method(),
            path = %request.uri().path(),
            client = %client
        )
    });

    let routes = Routes::new()
        // Public
        .route("/v1/status", get(public::get_status))
        // Protected
        .route("/v1/auth/permissions", get(protected::get_permissions))
        .route("/v1/notifications", get(protected::get_notification_list))
        .route(
            "/v1/notifications/unseen",
            get(protected::get_unseen_notification_count),
        )
        // Elevated
        .guarded(
            "/v1/notifications",
            AclConfig::any(["admin.notification"]),
            post(elevated::create_notifications),
        )?
        .guarded(
            "/v1/communities/:communityUid/notifications",
            AclConfig::any([
                "community.{{communityUid}}.founder",
                "community.{{communityUid}}.leader",
            ]),
            post(elevated::create_community_notifications),
        )?;

    Ok(routes
        .router
        .fallback(not_found)
        // Global middleware, outermost last
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(trace_layer)
        .layer(middleware::from_fn(real_ip))
        .layer(middleware::from_fn(security_headers))
        .layer(CorsLayer::permissive())
        .with_state(state))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
