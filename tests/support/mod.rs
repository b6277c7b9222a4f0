#![allow(dead_code)]

//! In-memory store fakes for exercising the services without Postgres.
//! Each fake keeps the same atomicity contract as the real store: every
//! trait call takes the lock once and applies its whole effect under it.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use social_feed_service::error::{AppError, Result};
use social_feed_service::models::{
    AuthorSummary, CandidatePost, DedupOutcome, NewNotification, Notification, NotificationView,
    PostSummary, RelationshipSnapshot, SenderSummary,
};
use social_feed_service::stores::{AffinityStore, NotificationStore, PostStore, UserStore};

// ---------------------------------------------------------------------------
// Users

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, RelationshipSnapshot>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, id: Uuid, snapshot: RelationshipSnapshot) {
        self.users.lock().unwrap().insert(id, snapshot);
    }

    pub fn insert_plain_user(&self, id: Uuid) {
        self.insert_user(id, RelationshipSnapshot::default());
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn relationship_snapshot(&self, user_id: Uuid) -> Result<Option<RelationshipSnapshot>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn blocked_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|s| s.blocked.clone())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Posts

#[derive(Debug, Clone)]
pub struct StoredPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Default)]
pub struct InMemoryPostStore {
    posts: Mutex<Vec<StoredPost>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_post(&self, post: StoredPost) {
        self.posts.lock().unwrap().push(post);
    }

    pub fn add(
        &self,
        author_id: Uuid,
        age: Duration,
        like_count: i64,
        comment_count: i64,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_post(StoredPost {
            id,
            author_id,
            title: format!("post-{}", id),
            created_at: Utc::now() - age,
            like_count,
            comment_count,
        });
        id
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn candidate_posts(
        &self,
        viewer_id: Uuid,
        excluded_authors: &[Uuid],
    ) -> Result<Vec<CandidatePost>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author_id != viewer_id && !excluded_authors.contains(&p.author_id))
            .map(|p| CandidatePost {
                post_id: p.id,
                author_id: p.author_id,
                created_at: p.created_at,
                like_count: p.like_count,
                comment_count: p.comment_count,
            })
            .collect())
    }

    async fn summaries_by_ids(&self, ids: &[Uuid]) -> Result<Vec<PostSummary>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| PostSummary {
                id: p.id,
                author: AuthorSummary {
                    id: p.author_id,
                    username: format!("user-{}", p.author_id.simple()),
                    display_name: None,
                    avatar_url: None,
                    bio: None,
                },
                title: p.title.clone(),
                content: None,
                photo_url: None,
                like_count: p.like_count,
                comment_count: p.comment_count,
                created_at: p.created_at,
                updated_at: p.created_at,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Notifications

#[derive(Default)]
pub struct InMemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }

    /// Shift every stored row into the past, standing in for wall-clock
    /// time passing between events.
    pub fn age_all(&self, by: Duration) {
        for row in self.rows.lock().unwrap().iter_mut() {
            row.created_at = row.created_at - by;
            row.updated_at = row.updated_at - by;
        }
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn upsert_within_window(
        &self,
        new: NewNotification,
        window: Duration,
    ) -> Result<DedupOutcome> {
        let now = Utc::now();
        let cutoff = now - window;
        let mut rows = self.rows.lock().unwrap();

        let live = rows
            .iter_mut()
            .filter(|r| {
                r.recipient_id == new.recipient_id
                    && r.sender_id == new.sender_id
                    && r.notification_type == new.notification_type
                    && (new.post_id.is_none() || r.post_id == new.post_id)
                    && r.created_at >= cutoff
            })
            .max_by_key(|r| r.created_at);

        if let Some(row) = live {
            row.message = new.message;
            row.is_read = false;
            row.created_at = now;
            row.updated_at = now;
            return Ok(DedupOutcome::Merged);
        }

        rows.push(Notification {
            id: Uuid::new_v4(),
            recipient_id: new.recipient_id,
            sender_id: new.sender_id,
            notification_type: new.notification_type,
            post_id: new.post_id,
            comment_id: new.comment_id,
            message: new.message,
            is_read: false,
            created_at: now,
            updated_at: now,
        });
        Ok(DedupOutcome::Created)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationView>> {
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<&Notification> = rows
            .iter()
            .filter(|r| r.recipient_id == recipient_id && (!unread_only || !r.is_read))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|r| NotificationView {
                id: r.id,
                sender: SenderSummary {
                    id: r.sender_id,
                    username: format!("user-{}", r.sender_id.simple()),
                    display_name: None,
                    avatar_url: None,
                },
                notification_type: r.notification_type,
                post_id: r.post_id,
                post_title: None,
                comment_id: r.comment_id,
                message: r.message.clone(),
                is_read: r.is_read,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
            .collect())
    }

    async fn count_for_recipient(&self, recipient_id: Uuid, unread_only: bool) -> Result<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.recipient_id == recipient_id && (!unread_only || !r.is_read))
            .count() as i64)
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64> {
        self.count_for_recipient(recipient_id, true).await
    }

    async fn mark_read(&self, recipient_id: Uuid, ids: Option<&[Uuid]>) -> Result<u64> {
        let mut updated = 0;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.recipient_id != recipient_id {
                continue;
            }
            if let Some(subset) = ids {
                if !subset.contains(&row.id) {
                    continue;
                }
            }
            if !row.is_read {
                row.is_read = true;
                row.updated_at = Utc::now();
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(&self, recipient_id: Uuid, notification_id: Uuid) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.id == notification_id && r.recipient_id == recipient_id));
        Ok(rows.len() < before)
    }
}

/// Notification store whose every call fails like a lost backend.
pub struct FailingNotificationStore;

impl FailingNotificationStore {
    fn unavailable<T>() -> Result<T> {
        Err(AppError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl NotificationStore for FailingNotificationStore {
    async fn upsert_within_window(
        &self,
        _new: NewNotification,
        _window: Duration,
    ) -> Result<DedupOutcome> {
        Self::unavailable()
    }

    async fn list_for_recipient(
        &self,
        _recipient_id: Uuid,
        _unread_only: bool,
        _limit: i64,
        _offset: i64,
    ) -> Result<Vec<NotificationView>> {
        Self::unavailable()
    }

    async fn count_for_recipient(&self, _recipient_id: Uuid, _unread_only: bool) -> Result<i64> {
        Self::unavailable()
    }

    async fn unread_count(&self, _recipient_id: Uuid) -> Result<i64> {
        Self::unavailable()
    }

    async fn mark_read(&self, _recipient_id: Uuid, _ids: Option<&[Uuid]>) -> Result<u64> {
        Self::unavailable()
    }

    async fn delete(&self, _recipient_id: Uuid, _notification_id: Uuid) -> Result<bool> {
        Self::unavailable()
    }
}

// ---------------------------------------------------------------------------
// Affinity

#[derive(Default)]
pub struct InMemoryAffinityStore {
    scores: Mutex<HashMap<(Uuid, Uuid), i64>>,
}

impl InMemoryAffinityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, actor_id: Uuid, target_id: Uuid) -> Option<i64> {
        self.scores
            .lock()
            .unwrap()
            .get(&(actor_id, target_id))
            .copied()
    }
}

#[async_trait]
impl AffinityStore for InMemoryAffinityStore {
    async fn increment(&self, actor_id: Uuid, target_id: Uuid, delta: i64) -> Result<()> {
        *self
            .scores
            .lock()
            .unwrap()
            .entry((actor_id, target_id))
            .or_insert(0) += delta;
        Ok(())
    }

    async fn top_targets(&self, actor_id: Uuid, k: i64) -> Result<Vec<Uuid>> {
        let scores = self.scores.lock().unwrap();
        let mut entries: Vec<(Uuid, i64)> = scores
            .iter()
            .filter(|((actor, _), _)| *actor == actor_id)
            .map(|((_, target), score)| (*target, *score))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(entries.into_iter().take(k as usize).map(|(t, _)| t).collect())
    }
}
