use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewNotification, Notification, NotificationPage, NotificationStore, StoreResult};

/// Process-local notification store
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a notification as-is, keeping its timestamps
    pub async fn insert(&self, notification: Notification) {
        self.notifications.write().await.push(notification);
    }

    fn newest_first(mut rows: Vec<Notification>) -> Vec<Notification> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn list_unseen(&self, user_uid: Uuid) -> StoreResult<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let rows = notifications
            .iter()
            .filter(|n| n.user_uid == user_uid && n.seen_at.is_none())
            .cloned()
            .collect();
        Ok(Self::newest_first(rows))
    }

    async fn list_page(
        &self,
        user_uid: Uuid,
        limit: usize,
        offset: usize,
    ) -> StoreResult<NotificationPage> {
        let notifications = self.notifications.read().await;
        let rows: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.user_uid == user_uid)
            .cloned()
            .collect();
        let total = rows.len();
        let rows = Self::newest_first(rows)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();

        Ok(NotificationPage { rows, total })
    }

    async fn count_unseen(&self, user_uid: Uuid) -> StoreResult<usize> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.user_uid == user_uid && n.seen_at.is_none())
            .count())
    }

    async fn mark_seen(&self, uids: &[Uuid], seen_at: DateTime<Utc>) -> StoreResult<()> {
        let mut notifications = self.notifications.write().await;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.seen_at.is_none() && uids.contains(&n.uid))
        {
            notification.seen_at = Some(seen_at);
        }
        Ok(())
    }

    async fn create(&self, new: NewNotification) -> StoreResult<Notification> {
        let notification = Notification {
            uid: Uuid::new_v4(),
            user_uid: new.user_uid,
            notification_type: new.notification_type,
            data: new.data,
            seen_at: None,
            created_at: Utc::now(),
        };
        self.notifications.write().await.push(notification.clone());

        tracing::debug!(
            "Created {:?} notification {} for user {}",
            notification.notification_type,
            notification.uid,
            notification.user_uid
        );

        Ok(notification)
    }
}
