//! Internal engagement-event ingest, called by the post/comment/like
//! mutation services after their own writes succeed.
//!
//! An event fans out into two independent best-effort effects: a
//! deduplicated notification to the target and an affinity bump for the
//! actor. Each effect is atomic on its own; a failure in one never rolls
//! back the other or the caller's primary write.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{InteractionKind, NotificationType};
use crate::services::{AffinityService, NotificationService, NotifyInput};

#[derive(Debug, Deserialize)]
pub struct EngagementEventPayload {
    /// User who performed the action
    pub actor_id: Uuid,
    /// User on the receiving end (post author, followee, ...)
    pub target_user_id: Uuid,
    /// like | comment | view | follow | friend_request | post
    pub event_type: String,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub message: Option<String>,
}

/// Per-effect outcome reported back to the emitting service
#[derive(Debug, Serialize)]
pub struct EngagementOutcome {
    pub notification: String,
    pub affinity: String,
}

/// POST /internal/v1/engagement
pub async fn ingest_engagement(
    payload: web::Json<EngagementEventPayload>,
    notifications: web::Data<Arc<NotificationService>>,
    affinity: web::Data<Arc<AffinityService>>,
) -> Result<HttpResponse> {
    let event = payload.into_inner();

    if event.event_type.trim().is_empty() {
        return Err(AppError::InvalidArgument("event_type is required".to_string()));
    }

    let mut outcome = EngagementOutcome {
        notification: "not_applicable".to_string(),
        affinity: "not_applicable".to_string(),
    };

    if let Some(notification_type) = NotificationType::parse(&event.event_type) {
        let message = event
            .message
            .clone()
            .unwrap_or_else(|| notification_type.default_message().to_string());

        match notifications
            .notify(NotifyInput {
                recipient_id: event.target_user_id,
                sender_id: event.actor_id,
                notification_type,
                post_id: event.post_id,
                comment_id: event.comment_id,
                message,
            })
            .await
        {
            Ok(result) => outcome.notification = result.as_str().to_string(),
            Err(e) => {
                warn!(
                    "notification effect failed: actor={} target={} type={}: {}",
                    event.actor_id, event.target_user_id, event.event_type, e
                );
                outcome.notification = "failed".to_string();
            }
        }
    }

    if let Some(kind) = InteractionKind::parse(&event.event_type) {
        match affinity
            .record_interaction(event.actor_id, event.target_user_id, kind)
            .await
        {
            Ok(()) => outcome.affinity = "recorded".to_string(),
            Err(e) => {
                warn!(
                    "affinity effect failed: actor={} target={} kind={:?}: {}",
                    event.actor_id, event.target_user_id, kind, e
                );
                outcome.affinity = "failed".to_string();
            }
        }
    }

    Ok(HttpResponse::Ok().json(outcome))
}

/// Register internal engagement routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/engagement", web::post().to(ingest_engagement));
}
