// handlers/public/status.rs - GET /v1/status handler

use axum::extract::Query;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::middleware::{ApiResponse, ApiResult};

pub const STATUS_RUNNING: &str = "running";

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub ping: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Current server time, unix seconds
    pub now: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pong: Option<String>,
}

/// GET /v1/status - liveness check, echoes a non-empty `ping` as `pong`
pub async fn get_status(Query(query): Query<StatusQuery>) -> ApiResult<StatusResponse> {
    Ok(ApiResponse::success(StatusResponse {
        status: STATUS_RUNNING,
        version: env!("CARGO_PKG_VERSION"),
        now: Utc::now().timestamp(),
        pong: query.ping.filter(|ping| !ping.is_empty()),
    }))
}
