use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::InteractionKind;
use crate::stores::AffinityStore;

/// Tracks how strongly each user has engaged with other users, biasing
/// feed ranking toward meaningfully-interacted-with authors.
///
/// Scores only grow: an unlike never decrements (the engagement emitters
/// only report positive interactions).
pub struct AffinityService {
    store: Arc<dyn AffinityStore>,
}

impl AffinityService {
    pub fn new(store: Arc<dyn AffinityStore>) -> Self {
        Self { store }
    }

    /// Bump the actor's affinity toward the target by the fixed weight of
    /// the interaction kind. No-op for self-interactions. Best-effort:
    /// missing targets are not an error, only store failures propagate.
    pub async fn record_interaction(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        kind: InteractionKind,
    ) -> Result<()> {
        if actor_id == target_id {
            debug!("skipping self-interaction: user={}", actor_id);
            return Ok(());
        }

        self.store
            .increment(actor_id, target_id, kind.weight())
            .await?;

        debug!(
            "recorded interaction: actor={} target={} kind={:?} delta={}",
            actor_id,
            target_id,
            kind,
            kind.weight()
        );
        Ok(())
    }
}
