// handlers/protected/notifications.rs - V1 notification endpoints for the current user

use axum::extract::{Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::Credentials;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::notifications::Notification;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    #[serde(default)]
    pub include_seen: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl NotificationListQuery {
    /// Validated `(limit, offset)`
    fn pagination(&self) -> Result<(usize, usize), ApiError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::invalid_field(
                "limit",
                format!("must be between 1 and {}", MAX_LIMIT),
            ));
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::invalid_field("offset", "must not be negative"));
        }

        Ok((limit as usize, offset as usize))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPageResponse {
    pub limit: usize,
    pub offset: usize,
    pub count: usize,
    pub total: usize,
    pub more_available: bool,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct UnseenNotificationsResponse {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NotificationListResponse {
    Page(NotificationPageResponse),
    Unseen(UnseenNotificationsResponse),
}

#[derive(Debug, Serialize)]
pub struct UnseenCountResponse {
    pub unseen: usize,
}

/// GET /v1/notifications - unseen notifications, or a page of all of them with `includeSeen`.
/// Everything returned is marked as seen afterwards.
pub async fn get_notification_list(
    State(state): State<AppState>,
    credentials: Credentials,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<NotificationListResponse> {
    let user_uid = credentials.user.uid;
    let store = &state.notifications;

    let response = if query.include_seen {
        let (limit, offset) = query.pagination()?;
        let page = store.list_page(user_uid, limit, offset).await?;
        let count = page.rows.len();

        mark_unseen_as_seen(&state, &page.rows).await?;

        NotificationListResponse::Page(NotificationPageResponse {
            limit,
            offset,
            count,
            total: page.total,
            more_available: offset + count < page.total,
            notifications: page.rows,
        })
    } else {
        let notifications = store.list_unseen(user_uid).await?;

        mark_unseen_as_seen(&state, &notifications).await?;

        NotificationListResponse::Unseen(UnseenNotificationsResponse { notifications })
    };

    Ok(ApiResponse::success(response))
}

/// GET /v1/notifications/unseen - number of unseen notifications
pub async fn get_unseen_notification_count(
    State(state): State<AppState>,
    credentials: Credentials,
) -> ApiResult<UnseenCountResponse> {
    let unseen = state.notifications.count_unseen(credentials.user.uid).await?;

    Ok(ApiResponse::success(UnseenCountResponse { unseen }))
}

async fn mark_unseen_as_seen(state: &AppState, notifications: &[Notification]) -> Result<(), ApiError> {
    let unseen: Vec<Uuid> = notifications
        .iter()
        .filter(|n| n.seen_at.is_none())
        .map(|n| n.uid)
        .collect();

    if !unseen.is_empty() {
        state.notifications.mark_seen(&unseen, Utc::now()).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let query = NotificationListQuery::default();
        assert_eq!(query.pagination().unwrap(), (10, 0));
    }

    #[test]
    fn pagination_bounds() {
        let query = NotificationListQuery {
            include_seen: true,
            limit: Some(MAX_LIMIT + 1),
            offset: None,
        };
        assert_eq!(query.pagination().unwrap_err().status_code(), 400);

        let query = NotificationListQuery {
            include_seen: true,
            limit: Some(5),
            offset: Some(-1),
        };
        assert!(query.pagination().is_err());
    }
}
