/// Store interfaces the feed and notification cores are written against.
///
/// Each method models a single blocking store call. Implementations must
/// make the write operations atomic per key; callers never compose
/// read-then-write sequences around them.
use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    CandidatePost, DedupOutcome, NewNotification, NotificationView, PostSummary,
    RelationshipSnapshot,
};

/// Read access to users and their relationship sets
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the user's friends/following/blocked sets in one consistent
    /// read. `None` when the user does not exist.
    async fn relationship_snapshot(&self, user_id: Uuid) -> Result<Option<RelationshipSnapshot>>;

    /// Ids the user has blocked. Empty for a missing user; the notify path
    /// is tolerant of dangling recipient references.
    async fn blocked_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>>;
}

/// Read access to posts and their engagement counts
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts eligible for the viewer's feed: authored neither by the
    /// viewer nor by anyone in `excluded_authors`.
    async fn candidate_posts(
        &self,
        viewer_id: Uuid,
        excluded_authors: &[Uuid],
    ) -> Result<Vec<CandidatePost>>;

    /// Full projections for the given post ids, in no particular order.
    async fn summaries_by_ids(&self, ids: &[Uuid]) -> Result<Vec<PostSummary>>;
}

/// Notification persistence with windowed dedup at the store layer
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Atomic upsert: if a row matching `(recipient, sender, type, post)`
    /// exists with `created_at` inside `window`, overwrite its message,
    /// reset `created_at` and clear the read flag; otherwise insert a new
    /// row. The post-id predicate applies only when the event carries one.
    async fn upsert_within_window(
        &self,
        new: NewNotification,
        window: Duration,
    ) -> Result<DedupOutcome>;

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationView>>;

    async fn count_for_recipient(&self, recipient_id: Uuid, unread_only: bool) -> Result<i64>;

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64>;

    /// Mark all (or the given subset) of the recipient's notifications
    /// read. Returns the number of rows updated.
    async fn mark_read(&self, recipient_id: Uuid, ids: Option<&[Uuid]>) -> Result<u64>;

    /// Delete iff the row belongs to the recipient. Returns whether a row
    /// was removed.
    async fn delete(&self, recipient_id: Uuid, notification_id: Uuid) -> Result<bool>;
}

/// Per-user interaction affinity scores
#[async_trait]
pub trait AffinityStore: Send + Sync {
    /// Atomic increment-or-insert of `(actor, target)` by `delta`, setting
    /// the last-interaction timestamp. Never lost under concurrent calls
    /// for the same actor.
    async fn increment(&self, actor_id: Uuid, target_id: Uuid, delta: i64) -> Result<()>;

    /// Top-k target ids by score descending, ties broken by target id.
    async fn top_targets(&self, actor_id: Uuid, k: i64) -> Result<Vec<Uuid>>;
}
