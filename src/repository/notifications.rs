use async_trait::async_trait;
use chrono::Duration;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    DedupOutcome, NewNotification, NotificationType, NotificationView, SenderSummary,
};
use crate::stores::NotificationStore;

/// Postgres-backed notification log
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_type(s: &str) -> NotificationType {
        NotificationType::parse(s).unwrap_or(NotificationType::Post)
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn upsert_within_window(
        &self,
        new: NewNotification,
        window: Duration,
    ) -> Result<DedupOutcome> {
        // Row locks cannot serialize two concurrent FIRST events for the
        // same key: neither probe finds a row to lock and both would take
        // the insert branch. An advisory lock on the key, held for the
        // transaction, makes the probe-then-write sequence exclusive.
        let key = format!(
            "notification:{}:{}:{}:{}",
            new.recipient_id,
            new.sender_id,
            new.notification_type.as_str(),
            new.post_id.map(|p| p.to_string()).unwrap_or_default()
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(&key)
            .execute(&mut *tx)
            .await?;

        // Bump the newest live row for the dedup key, or insert a fresh
        // row when none is live.
        let result = sqlx::query(
            r#"
            WITH live AS (
                SELECT id FROM notifications
                WHERE recipient_id = $1
                  AND sender_id = $2
                  AND notification_type = $3
                  AND ($4::UUID IS NULL OR post_id = $4)
                  AND created_at >= NOW() - make_interval(secs => $5)
                ORDER BY created_at DESC
                LIMIT 1
            ), bumped AS (
                UPDATE notifications n
                SET message = $6, is_read = FALSE, created_at = NOW(), updated_at = NOW()
                FROM live
                WHERE n.id = live.id
                RETURNING n.id
            )
            INSERT INTO notifications
                (id, recipient_id, sender_id, notification_type, post_id, comment_id,
                 message, is_read, created_at, updated_at)
            SELECT $7, $1, $2, $3, $4, $8, $6, FALSE, NOW(), NOW()
            WHERE NOT EXISTS (SELECT 1 FROM bumped)
            "#,
        )
        .bind(new.recipient_id)
        .bind(new.sender_id)
        .bind(new.notification_type.as_str())
        .bind(new.post_id)
        .bind(window.num_seconds() as f64)
        .bind(&new.message)
        .bind(Uuid::new_v4())
        .bind(new.comment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if result.rows_affected() > 0 {
            Ok(DedupOutcome::Created)
        } else {
            Ok(DedupOutcome::Merged)
        }
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationView>> {
        let rows = sqlx::query(
            r#"
            SELECT n.id, n.notification_type, n.post_id, n.comment_id, n.message,
                   n.is_read, n.created_at, n.updated_at,
                   s.id AS sender_id, s.username AS sender_username,
                   s.display_name AS sender_display_name,
                   s.avatar_url AS sender_avatar_url,
                   p.title AS post_title
            FROM notifications n
            JOIN users s ON s.id = n.sender_id
            LEFT JOIN posts p ON p.id = n.post_id
            WHERE n.recipient_id = $1
              AND ($2 = FALSE OR n.is_read = FALSE)
            ORDER BY n.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(recipient_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let type_str: String = row.get("notification_type");
                NotificationView {
                    id: row.get("id"),
                    sender: SenderSummary {
                        id: row.get("sender_id"),
                        username: row.get("sender_username"),
                        display_name: row.get("sender_display_name"),
                        avatar_url: row.get("sender_avatar_url"),
                    },
                    notification_type: Self::parse_type(&type_str),
                    post_id: row.get("post_id"),
                    post_title: row.get("post_title"),
                    comment_id: row.get("comment_id"),
                    message: row.get("message"),
                    is_read: row.get("is_read"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                }
            })
            .collect())
    }

    async fn count_for_recipient(&self, recipient_id: Uuid, unread_only: bool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE recipient_id = $1
              AND ($2 = FALSE OR is_read = FALSE)
            "#,
        )
        .bind(recipient_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64> {
        self.count_for_recipient(recipient_id, true).await
    }

    async fn mark_read(&self, recipient_id: Uuid, ids: Option<&[Uuid]>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, updated_at = NOW()
            WHERE recipient_id = $1
              AND ($2::UUID[] IS NULL OR id = ANY($2))
            "#,
        )
        .bind(recipient_id)
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, recipient_id: Uuid, notification_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE id = $1 AND recipient_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
