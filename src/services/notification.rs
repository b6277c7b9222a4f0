use chrono::Duration;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::error::{AppError, Result};
use crate::models::{
    DedupOutcome, NewNotification, NotificationPage, NotificationType, NotifyOutcome,
};
use crate::services::ranker;
use crate::stores::{NotificationStore, UserStore};

/// Inputs of one notification event
#[derive(Debug, Clone)]
pub struct NotifyInput {
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub message: String,
}

/// Maintains the per-recipient notification log with time-windowed dedup.
///
/// Repeated events with the same `(recipient, sender, type, post)` key
/// inside the window collapse into one row that is bumped back to the top
/// of recency-sorted views; separated events create distinct rows.
pub struct NotificationService {
    users: Arc<dyn UserStore>,
    store: Arc<dyn NotificationStore>,
    config: NotificationConfig,
}

impl NotificationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        store: Arc<dyn NotificationStore>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            users,
            store,
            config,
        }
    }

    /// Record an incoming notification event, merging it into a live row
    /// when one exists. Self-notifications and blocked senders are
    /// suppressed, not failures.
    pub async fn notify(&self, input: NotifyInput) -> Result<NotifyOutcome> {
        if input.recipient_id == input.sender_id {
            debug!("skipping self-notification: user={}", input.sender_id);
            return Ok(NotifyOutcome::Skipped);
        }

        let blocked = self.users.blocked_ids(input.recipient_id).await?;
        if blocked.contains(&input.sender_id) {
            debug!(
                "suppressing notification from blocked sender: recipient={} sender={}",
                input.recipient_id, input.sender_id
            );
            return Ok(NotifyOutcome::Skipped);
        }

        let window = Duration::seconds(self.config.dedup_window_secs);
        let outcome = self
            .store
            .upsert_within_window(
                NewNotification {
                    recipient_id: input.recipient_id,
                    sender_id: input.sender_id,
                    notification_type: input.notification_type,
                    post_id: input.post_id,
                    comment_id: input.comment_id,
                    message: input.message,
                },
                window,
            )
            .await?;

        debug!(
            "notification {}: recipient={} sender={} type={}",
            match outcome {
                DedupOutcome::Created => "created",
                DedupOutcome::Merged => "merged",
            },
            input.recipient_id,
            input.sender_id,
            input.notification_type.as_str()
        );

        Ok(match outcome {
            DedupOutcome::Created => NotifyOutcome::Created,
            DedupOutcome::Merged => NotifyOutcome::Merged,
        })
    }

    /// Recency-sorted page of the recipient's notifications, with the
    /// total unread count regardless of the filter.
    pub async fn list(
        &self,
        recipient_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
        unread_only: bool,
    ) -> Result<NotificationPage> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(self.config.default_limit);

        if page < 1 || limit < 1 || limit > self.config.max_limit {
            return Err(AppError::InvalidArgument(format!(
                "page must be >= 1 and limit between 1 and {}",
                self.config.max_limit
            )));
        }

        let offset = (page - 1) * limit;
        let notifications = self
            .store
            .list_for_recipient(recipient_id, unread_only, limit, offset)
            .await?;
        let total_docs = self.store.count_for_recipient(recipient_id, unread_only).await?;
        let unread_count = self.store.unread_count(recipient_id).await?;

        let meta = ranker::page_meta(total_docs, page, limit);

        Ok(NotificationPage {
            notifications,
            total_docs,
            total_pages: meta.total_pages,
            current_page: page,
            unread_count,
        })
    }

    /// Mark all (or the given subset) of the recipient's notifications read.
    pub async fn mark_read(
        &self,
        recipient_id: Uuid,
        notification_ids: Option<Vec<Uuid>>,
    ) -> Result<u64> {
        let updated = self
            .store
            .mark_read(recipient_id, notification_ids.as_deref())
            .await?;
        debug!(
            "marked notifications read: recipient={} updated={}",
            recipient_id, updated
        );
        Ok(updated)
    }

    /// Delete one notification iff it belongs to the recipient.
    pub async fn delete(&self, recipient_id: Uuid, notification_id: Uuid) -> Result<()> {
        let removed = self.store.delete(recipient_id, notification_id).await?;
        if !removed {
            return Err(AppError::NotFound(
                "notification not found or not owned by caller".to_string(),
            ));
        }
        Ok(())
    }
}
