use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::{data::notification::NotificationRepository, model::notification::NotificationLevel};

/// Delivers user-facing notifications.
///
/// Delivery is fire-and-forget: failures are logged by the implementation and never returned
/// to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: i32, title: &str, message: &str, level: NotificationLevel);
}

/// [`Notifier`] storing notifications in the `notification` table.
pub struct DbNotifier {
    db: DatabaseConnection,
}

impl DbNotifier {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Notifier for DbNotifier {
    async fn notify(&self, user_id: i32, title: &str, message: &str, level: NotificationLevel) {
        let notification_repo = NotificationRepository::new(&self.db);

        if let Err(e) = notification_repo
            .create(user_id, title, message, level)
            .await
        {
            tracing::error!(
                "Failed to store {} notification for user {}: {:?}",
                level,
                user_id,
                e
            );
        }
    }
}
