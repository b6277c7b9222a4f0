use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::FeedService;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Personalized feed for the authenticated user
///
/// GET /api/v1/feed?page=&limit=
pub async fn get_feed(
    user_id: UserId,
    query: web::Query<FeedQueryParams>,
    service: web::Data<Arc<FeedService>>,
) -> Result<HttpResponse> {
    debug!(
        "feed request: user={} page={:?} limit={:?}",
        user_id.0, query.page, query.limit
    );

    let page = service
        .personalized_feed(user_id.0, query.page, query.limit)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Register feed routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/feed", web::get().to(get_feed));
}
