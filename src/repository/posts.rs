use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AuthorSummary, CandidatePost, PostSummary};
use crate::stores::PostStore;

/// Postgres-backed post reads with aggregated engagement counts
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn candidate_posts(
        &self,
        viewer_id: Uuid,
        excluded_authors: &[Uuid],
    ) -> Result<Vec<CandidatePost>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.author_id, p.created_at,
                   COALESCE(l.cnt, 0)::BIGINT AS like_count,
                   COALESCE(c.cnt, 0)::BIGINT AS comment_count
            FROM posts p
            LEFT JOIN (
                SELECT post_id, COUNT(*) AS cnt FROM post_likes GROUP BY post_id
            ) l ON l.post_id = p.id
            LEFT JOIN (
                SELECT post_id, COUNT(*) AS cnt FROM post_comments GROUP BY post_id
            ) c ON c.post_id = p.id
            WHERE p.author_id <> $1
              AND p.author_id <> ALL($2)
            "#,
        )
        .bind(viewer_id)
        .bind(excluded_authors)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| CandidatePost {
                post_id: row.get("id"),
                author_id: row.get("author_id"),
                created_at: row.get("created_at"),
                like_count: row.get("like_count"),
                comment_count: row.get("comment_count"),
            })
            .collect())
    }

    async fn summaries_by_ids(&self, ids: &[Uuid]) -> Result<Vec<PostSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT p.id, p.title, p.content, p.photo_url, p.created_at, p.updated_at,
                   u.id AS author_id, u.username, u.display_name, u.avatar_url, u.bio,
                   COALESCE(l.cnt, 0)::BIGINT AS like_count,
                   COALESCE(c.cnt, 0)::BIGINT AS comment_count
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN (
                SELECT post_id, COUNT(*) AS cnt FROM post_likes GROUP BY post_id
            ) l ON l.post_id = p.id
            LEFT JOIN (
                SELECT post_id, COUNT(*) AS cnt FROM post_comments GROUP BY post_id
            ) c ON c.post_id = p.id
            WHERE p.id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| PostSummary {
                id: row.get("id"),
                author: AuthorSummary {
                    id: row.get("author_id"),
                    username: row.get("username"),
                    display_name: row.get("display_name"),
                    avatar_url: row.get("avatar_url"),
                    bio: row.get("bio"),
                },
                title: row.get("title"),
                content: row.get("content"),
                photo_url: row.get("photo_url"),
                like_count: row.get("like_count"),
                comment_count: row.get("comment_count"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
            .collect())
    }
}
