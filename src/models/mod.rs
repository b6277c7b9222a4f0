use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Notification type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// User liked a post
    Like,
    /// User commented on a post
    Comment,
    /// User started following
    Follow,
    /// User sent a friend request
    FriendRequest,
    /// User published a new post
    Post,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Like => "like",
            NotificationType::Comment => "comment",
            NotificationType::Follow => "follow",
            NotificationType::FriendRequest => "friend_request",
            NotificationType::Post => "post",
        }
    }

    /// Parse from an event type string; unknown types do not notify
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "like" => Some(NotificationType::Like),
            "comment" => Some(NotificationType::Comment),
            "follow" => Some(NotificationType::Follow),
            "friend_request" => Some(NotificationType::FriendRequest),
            "post" => Some(NotificationType::Post),
            _ => None,
        }
    }

    /// Fallback message when the emitting service did not provide one
    pub fn default_message(&self) -> &'static str {
        match self {
            NotificationType::Like => "liked your post",
            NotificationType::Comment => "commented on your post",
            NotificationType::Follow => "started following you",
            NotificationType::FriendRequest => "sent you a friend request",
            NotificationType::Post => "published a new post",
        }
    }
}

/// Engagement interaction kind, mapped to a fixed affinity increment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Comment,
    View,
}

impl InteractionKind {
    /// Parse from an event type string; unknown kinds contribute nothing
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "like" => Some(InteractionKind::Like),
            "comment" => Some(InteractionKind::Comment),
            "view" => Some(InteractionKind::View),
            _ => None,
        }
    }

    /// Affinity score increment for this kind of interaction
    pub fn weight(&self) -> i64 {
        match self {
            InteractionKind::Like => 5,
            InteractionKind::Comment => 10,
            InteractionKind::View => 1,
        }
    }
}

/// One consistent read of a user's relationship sets
#[derive(Debug, Clone, Default)]
pub struct RelationshipSnapshot {
    pub friends: HashSet<Uuid>,
    pub following: HashSet<Uuid>,
    pub blocked: HashSet<Uuid>,
}

/// A post eligible for feed ranking, with the engagement counts the
/// ranker needs. Author exclusion has already been applied by the store.
#[derive(Debug, Clone)]
pub struct CandidatePost {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
}

/// Public author fields projected into feed and notification views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// Post projection returned by the feed: content fields, counts and the
/// author's public fields. Never raw affinity or priority internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub author: AuthorSummary,
    pub title: String,
    pub content: Option<String>,
    pub photo_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A ranked feed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: PostSummary,
    pub feed_score: f64,
}

/// One page of ranked feed results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<FeedPost>,
    pub total_docs: i64,
    pub total_pages: i64,
    pub current_page: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<i64>,
    pub has_more: bool,
}

/// Stored notification row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a notification that does not exist yet
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub message: String,
}

/// Public sender fields projected into notification views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Notification as returned to the recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub sender: SenderSummary,
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub post_title: Option<String>,
    pub comment_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of a recipient's notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPage {
    pub notifications: Vec<NotificationView>,
    pub total_docs: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub unread_count: i64,
}

/// What the store did with a windowed notification upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// No live row existed; a new one was inserted
    Created,
    /// A live row was bumped in place
    Merged,
}

/// What notify() did with an engagement event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Created,
    Merged,
    /// Self-notification or blocked sender; nothing stored
    Skipped,
}

impl NotifyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyOutcome::Created => "created",
            NotifyOutcome::Merged => "merged",
            NotifyOutcome::Skipped => "skipped",
        }
    }
}
