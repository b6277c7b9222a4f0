use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::error::{AppError, Result};
use crate::models::{FeedPage, FeedPost};
use crate::services::ranker::{self, RankContext};
use crate::stores::{AffinityStore, PostStore, UserStore};

/// Produces the ranked, paginated personalized feed for a user.
///
/// Reads the viewer's relationship snapshot and affinity list once, scores
/// the candidate set in memory, then projects only the requested page.
pub struct FeedService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    affinity: Arc<dyn AffinityStore>,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        affinity: Arc<dyn AffinityStore>,
        config: FeedConfig,
    ) -> Self {
        Self {
            users,
            posts,
            affinity,
            config,
        }
    }

    pub async fn personalized_feed(
        &self,
        user_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<FeedPage> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(self.config.default_limit);

        if page < 1 || limit < 1 || limit > self.config.max_limit {
            return Err(AppError::InvalidArgument(format!(
                "page must be >= 1 and limit between 1 and {}",
                self.config.max_limit
            )));
        }

        let snapshot = self
            .users
            .relationship_snapshot(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;

        let top_affinity = self
            .affinity
            .top_targets(user_id, self.config.affinity_top_k)
            .await?;

        let excluded: Vec<Uuid> = snapshot.blocked.iter().copied().collect();
        let candidates = self.posts.candidate_posts(user_id, &excluded).await?;

        debug!(
            "ranking feed: user={} candidates={} connections={} top_affinity={}",
            user_id,
            candidates.len(),
            snapshot.friends.len() + snapshot.following.len(),
            top_affinity.len()
        );

        let ctx = RankContext {
            connections: snapshot
                .friends
                .iter()
                .chain(snapshot.following.iter())
                .copied()
                .collect(),
            top_affinity: top_affinity.into_iter().collect(),
            now: Utc::now(),
        };

        let ranked = ranker::rank(&ctx, candidates);
        let meta = ranker::page_meta(ranked.len() as i64, page, limit);

        let start = ((page - 1) * limit) as usize;
        let page_slice = if start < ranked.len() {
            &ranked[start..(start + limit as usize).min(ranked.len())]
        } else {
            &[]
        };

        let page_ids: Vec<Uuid> = page_slice.iter().map(|r| r.post_id).collect();
        let scores: HashMap<Uuid, f64> = page_slice
            .iter()
            .map(|r| (r.post_id, r.feed_score))
            .collect();

        let summaries = if page_ids.is_empty() {
            Vec::new()
        } else {
            self.posts.summaries_by_ids(&page_ids).await?
        };

        // Restore ranked order; the store returns summaries unordered.
        let mut by_id: HashMap<Uuid, _> = summaries.into_iter().map(|s| (s.id, s)).collect();
        let posts: Vec<FeedPost> = page_ids
            .iter()
            .filter_map(|id| {
                by_id.remove(id).map(|post| FeedPost {
                    feed_score: scores.get(id).copied().unwrap_or_default(),
                    post,
                })
            })
            .collect();

        Ok(FeedPage {
            posts,
            total_docs: meta.total_docs,
            total_pages: meta.total_pages,
            current_page: meta.current_page,
            next_page: meta.next_page,
            prev_page: meta.prev_page,
            has_more: meta.has_more,
        })
    }
}
