//! User notifications and the store behind them.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub use memory::InMemoryNotificationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    Generic,
    CommunityAnnouncement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub uid: Uuid,
    pub user_uid: Uuid,
    pub notification_type: NotificationType,
    pub data: Value,
    pub seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_uid: Uuid,
    pub notification_type: NotificationType,
    pub data: Value,
}

/// One page of a user's notifications plus the total number available
#[derive(Debug, Clone)]
pub struct NotificationPage {
    pub rows: Vec<Notification>,
    pub total: usize,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for notifications. Listings are ordered newest first.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// All notifications of `user_uid` that were never seen
    async fn list_unseen(&self, user_uid: Uuid) -> StoreResult<Vec<Notification>>;

    /// Seen and unseen notifications of `user_uid`, paginated
    async fn list_page(&self, user_uid: Uuid, limit: usize, offset: usize)
        -> StoreResult<NotificationPage>;

    async fn count_unseen(&self, user_uid: Uuid) -> StoreResult<usize>;

    /// Set `seen_at` on the given notifications that are still unseen
    async fn mark_seen(&self, uids: &[Uuid], seen_at: DateTime<Utc>) -> StoreResult<()>;

    async fn create(&self, notification: NewNotification) -> StoreResult<Notification>;
}
