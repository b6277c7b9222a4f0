//! Feed ranking
//!
//! Blends social proximity, behavioral affinity, content engagement and
//! recency into one composite score per candidate post:
//!
//! - priority: 2 if the author is both followed/friended and in the
//!   viewer's top-affinity list, 1 if only followed/friended, 0 otherwise
//! - engagement: likes + 2 * comments (comments weigh double)
//! - recency: post age in fractional days, larger is older
//! - feed_score = 1000 * priority + 10 * engagement + (100 - recency)
//!
//! Priority dominates, engagement is secondary, recency is a bounded
//! tie-break. The recency term goes negative past 100 days; relative
//! ordering within the window is still by age, so it is left unclamped.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::CandidatePost;

const PRIORITY_WEIGHT: f64 = 1000.0;
const ENGAGEMENT_WEIGHT: f64 = 10.0;
const RECENCY_BASE: f64 = 100.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// The viewer-side inputs of one ranking pass, read once before scoring.
#[derive(Debug, Clone)]
pub struct RankContext {
    /// friends ∪ following
    pub connections: HashSet<Uuid>,
    /// Top-k targets by interaction score
    pub top_affinity: HashSet<Uuid>,
    /// Scoring timestamp, fixed for the whole pass
    pub now: DateTime<Utc>,
}

/// A candidate with its computed score, ready for pagination.
#[derive(Debug, Clone)]
pub struct RankedPost {
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub feed_score: f64,
}

/// Pagination metadata computed over the full candidate count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub total_docs: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub next_page: Option<i64>,
    pub prev_page: Option<i64>,
    pub has_more: bool,
}

/// Tie-break signal prioritizing authors the viewer both follows and
/// actively engages with.
pub fn priority_score(ctx: &RankContext, author_id: Uuid) -> i64 {
    if !ctx.connections.contains(&author_id) {
        return 0;
    }
    if ctx.top_affinity.contains(&author_id) {
        2
    } else {
        1
    }
}

pub fn engagement_score(post: &CandidatePost) -> i64 {
    post.like_count + 2 * post.comment_count
}

pub fn feed_score(ctx: &RankContext, post: &CandidatePost) -> f64 {
    let recency_days =
        (ctx.now - post.created_at).num_milliseconds() as f64 / (SECONDS_PER_DAY * 1000.0);

    PRIORITY_WEIGHT * priority_score(ctx, post.author_id) as f64
        + ENGAGEMENT_WEIGHT * engagement_score(post) as f64
        + (RECENCY_BASE - recency_days)
}

/// Score and sort candidates: feed score descending, then created_at
/// descending, then post id as a deterministic final key.
pub fn rank(ctx: &RankContext, candidates: Vec<CandidatePost>) -> Vec<RankedPost> {
    let mut ranked: Vec<RankedPost> = candidates
        .into_iter()
        .map(|post| RankedPost {
            post_id: post.post_id,
            created_at: post.created_at,
            feed_score: feed_score(ctx, &post),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.feed_score
            .partial_cmp(&a.feed_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.post_id.cmp(&b.post_id))
    });

    ranked
}

/// Offset pagination over `total_docs` ranked candidates.
///
/// Neighbor pages are arithmetic: a request past the last page still
/// reports `prev_page = page - 1` even though that page may itself be
/// past the end, matching how the feed API has always paginated.
pub fn page_meta(total_docs: i64, page: i64, limit: i64) -> PageMeta {
    let total_pages = if total_docs == 0 {
        0
    } else {
        (total_docs + limit - 1) / limit
    };

    PageMeta {
        total_docs,
        total_pages,
        current_page: page,
        next_page: if page < total_pages {
            Some(page + 1)
        } else {
            None
        },
        prev_page: if page > 1 { Some(page - 1) } else { None },
        has_more: page < total_pages,
    }
}
