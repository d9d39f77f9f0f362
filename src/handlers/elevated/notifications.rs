// handlers/elevated/notifications.rs - notification fan-out for admins and community leadership

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::Credentials;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::notifications::{NewNotification, Notification, NotificationType};

pub const MAX_RECIPIENTS: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationsRequest {
    pub user_uids: Vec<Uuid>,
    pub message: String,
}

impl CreateNotificationsRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.user_uids.is_empty() {
            return Err(ApiError::invalid_field("userUids", "must not be empty"));
        }
        if self.user_uids.len() > MAX_RECIPIENTS {
            return Err(ApiError::invalid_field(
                "userUids",
                format!("must not contain more than {} entries", MAX_RECIPIENTS),
            ));
        }
        if self.message.trim().is_empty() {
            return Err(ApiError::invalid_field("message", "must not be blank"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedNotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// POST /v1/notifications - generic notification to the listed users (`admin.notification`)
pub async fn create_notifications(
    State(state): State<AppState>,
    credentials: Credentials,
    Json(body): Json<CreateNotificationsRequest>,
) -> ApiResult<CreatedNotificationsResponse> {
    body.validate()?;

    let data = json!({
        "message": body.message.trim(),
        "senderUid": credentials.user.uid,
    });

    let notifications = fan_out(&state, &body.user_uids, NotificationType::Generic, data).await?;

    tracing::info!(
        "User {} sent {} generic notifications",
        credentials.user.uid,
        notifications.len()
    );

    Ok(ApiResponse::created(CreatedNotificationsResponse { notifications }))
}

/// POST /v1/communities/:communityUid/notifications - announcement from community founders or leaders
pub async fn create_community_notifications(
    State(state): State<AppState>,
    Path(community_uid): Path<Uuid>,
    credentials: Credentials,
    Json(body): Json<CreateNotificationsRequest>,
) -> ApiResult<CreatedNotificationsResponse> {
    body.validate()?;

    let data = json!({
        "message": body.message.trim(),
        "senderUid": credentials.user.uid,
        "communityUid": community_uid,
    });

    let notifications = fan_out(
        &state,
        &body.user_uids,
        NotificationType::CommunityAnnouncement,
        data,
    )
    .await?;

    tracing::info!(
        "User {} sent {} announcements for community {}",
        credentials.user.uid,
        notifications.len(),
        community_uid
    );

    Ok(ApiResponse::created(CreatedNotificationsResponse { notifications }))
}

async fn fan_out(
    state: &AppState,
    user_uids: &[Uuid],
    notification_type: NotificationType,
    data: serde_json::Value,
) -> Result<Vec<Notification>, ApiError> {
    let mut created = Vec::with_capacity(user_uids.len());
    for user_uid in user_uids {
        let notification = state
            .notifications
            .create(NewNotification {
                user_uid: *user_uid,
                notification_type,
                data: data.clone(),
            })
            .await?;
        created.push(notification);
    }
    Ok(created)
}
