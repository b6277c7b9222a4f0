use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::Result;
use crate::models::RelationshipSnapshot;
use crate::stores::UserStore;

/// Postgres-backed user relationship reads
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn relationship_snapshot(&self, user_id: Uuid) -> Result<Option<RelationshipSnapshot>> {
        // One statement so the three sets come from a single snapshot.
        let row = sqlx::query(
            r#"
            SELECT
                ARRAY(SELECT friend_id FROM user_friends WHERE user_id = u.id) AS friends,
                ARRAY(SELECT followee_id FROM user_follows WHERE follower_id = u.id) AS following,
                ARRAY(SELECT blocked_id FROM user_blocks WHERE user_id = u.id) AS blocked
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| RelationshipSnapshot {
            friends: r.get::<Vec<Uuid>, _>("friends").into_iter().collect(),
            following: r.get::<Vec<Uuid>, _>("following").into_iter().collect(),
            blocked: r.get::<Vec<Uuid>, _>("blocked").into_iter().collect(),
        }))
    }

    async fn blocked_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT blocked_id FROM user_blocks
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }
}
