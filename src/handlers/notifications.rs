use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::NotificationService;

#[derive(Debug, Deserialize)]
pub struct NotificationQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadPayload {
    /// When absent, every notification of the caller is marked read
    pub notification_ids: Option<Vec<Uuid>>,
}

/// Recency-sorted notifications for the authenticated user
///
/// GET /api/v1/notifications?page=&limit=&unread_only=
pub async fn list_notifications(
    user_id: UserId,
    query: web::Query<NotificationQueryParams>,
    service: web::Data<Arc<NotificationService>>,
) -> Result<HttpResponse> {
    let page = service
        .list(user_id.0, query.page, query.limit, query.unread_only)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Mark all (or a subset of) the caller's notifications read
///
/// PATCH /api/v1/notifications/read
pub async fn mark_read(
    user_id: UserId,
    payload: web::Json<MarkReadPayload>,
    service: web::Data<Arc<NotificationService>>,
) -> Result<HttpResponse> {
    let updated = service
        .mark_read(user_id.0, payload.into_inner().notification_ids)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}

/// Delete one notification owned by the caller
///
/// DELETE /api/v1/notifications/{id}
pub async fn delete_notification(
    user_id: UserId,
    path: web::Path<Uuid>,
    service: web::Data<Arc<NotificationService>>,
) -> Result<HttpResponse> {
    service.delete(user_id.0, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register notification routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("/read", web::patch().to(mark_read))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}
