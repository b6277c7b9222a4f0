use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::stores::AffinityStore;

/// Postgres-backed interaction affinity scores
#[derive(Clone)]
pub struct PgAffinityStore {
    pool: PgPool,
}

impl PgAffinityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AffinityStore for PgAffinityStore {
    async fn increment(&self, actor_id: Uuid, target_id: Uuid, delta: i64) -> Result<()> {
        // Atomic increment-or-insert; concurrent engagement bursts on the
        // same actor never lose an update.
        sqlx::query(
            r#"
            INSERT INTO interaction_scores (user_id, target_id, score, last_interacted_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, target_id) DO UPDATE
            SET score = interaction_scores.score + EXCLUDED.score,
                last_interacted_at = NOW()
            "#,
        )
        .bind(actor_id)
        .bind(target_id)
        .bind(delta)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn top_targets(&self, actor_id: Uuid, k: i64) -> Result<Vec<Uuid>> {
        let targets: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT target_id FROM interaction_scores
            WHERE user_id = $1
            ORDER BY score DESC, target_id ASC
            LIMIT $2
            "#,
        )
        .bind(actor_id)
        .bind(k)
        .fetch_all(&self.pool)
        .await?;

        Ok(targets)
    }
}
