//! Engagement events fanned out to both effects: the windowed
//! notification upsert and the affinity increment. The effects are
//! independent, so each is asserted on its own store.

mod support;

use actix_web::{test, web, App};
use std::sync::Arc;
use uuid::Uuid;

use social_feed_service::config::NotificationConfig;
use social_feed_service::handlers::engagement::register_routes;
use social_feed_service::models::{InteractionKind, NotificationType, NotifyOutcome};
use social_feed_service::services::{AffinityService, NotificationService, NotifyInput};
use social_feed_service::AppError;
use support::{
    FailingNotificationStore, InMemoryAffinityStore, InMemoryNotificationStore, InMemoryUserStore,
};

struct Fixture {
    users: Arc<InMemoryUserStore>,
    notifications: Arc<InMemoryNotificationStore>,
    affinity: Arc<InMemoryAffinityStore>,
    notification_service: NotificationService,
    affinity_service: AffinityService,
}

fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserStore::new());
    let notifications = Arc::new(InMemoryNotificationStore::new());
    let affinity = Arc::new(InMemoryAffinityStore::new());
    let notification_service = NotificationService::new(
        users.clone(),
        notifications.clone(),
        NotificationConfig::default(),
    );
    let affinity_service = AffinityService::new(affinity.clone());
    Fixture {
        users,
        notifications,
        affinity,
        notification_service,
        affinity_service,
    }
}

#[tokio::test]
async fn like_toggle_burst_yields_one_notification_and_one_increment() {
    // A likes, unlikes, then likes O's post again within a minute. The
    // emitter sends a notify per like and a single net interaction.
    let fx = fixture();
    let actor = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let post = Uuid::new_v4();
    fx.users.insert_plain_user(owner);

    let like = |msg: &str| NotifyInput {
        recipient_id: owner,
        sender_id: actor,
        notification_type: NotificationType::Like,
        post_id: Some(post),
        comment_id: None,
        message: msg.to_string(),
    };

    let first = fx.notification_service.notify(like("liked your post")).await.unwrap();
    assert_eq!(first, NotifyOutcome::Created);
    let second = fx
        .notification_service
        .notify(like("liked your post"))
        .await
        .unwrap();
    assert_eq!(second, NotifyOutcome::Merged);

    fx.affinity_service
        .record_interaction(actor, owner, InteractionKind::Like)
        .await
        .unwrap();

    assert_eq!(fx.notifications.all().len(), 1);
    assert_eq!(fx.affinity.score(actor, owner), Some(5));
}

#[tokio::test]
async fn comment_notifies_and_raises_affinity_independently() {
    let fx = fixture();
    let actor = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let post = Uuid::new_v4();
    let comment = Uuid::new_v4();
    fx.users.insert_plain_user(owner);

    fx.notification_service
        .notify(NotifyInput {
            recipient_id: owner,
            sender_id: actor,
            notification_type: NotificationType::Comment,
            post_id: Some(post),
            comment_id: Some(comment),
            message: "commented on your post".to_string(),
        })
        .await
        .unwrap();
    fx.affinity_service
        .record_interaction(actor, owner, InteractionKind::Comment)
        .await
        .unwrap();

    let rows = fx.notifications.all();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].comment_id, Some(comment));
    assert_eq!(fx.affinity.score(actor, owner), Some(10));
}

#[tokio::test]
async fn store_failure_surfaces_as_unavailable() {
    let users = Arc::new(InMemoryUserStore::new());
    let service = NotificationService::new(
        users.clone(),
        Arc::new(FailingNotificationStore),
        NotificationConfig::default(),
    );
    let recipient = Uuid::new_v4();
    users.insert_plain_user(recipient);

    let err = service
        .notify(NotifyInput {
            recipient_id: recipient,
            sender_id: Uuid::new_v4(),
            notification_type: NotificationType::Like,
            post_id: Some(Uuid::new_v4()),
            comment_id: None,
            message: "liked your post".to_string(),
        })
        .await;

    assert!(matches!(err, Err(AppError::Unavailable(_))));
}

#[actix_web::test]
async fn failed_notification_effect_still_records_affinity() {
    // The two effects are dispatched independently: the notification store
    // being down must not block the affinity increment or fail the call.
    let users = Arc::new(InMemoryUserStore::new());
    let affinity_store = Arc::new(InMemoryAffinityStore::new());
    let notification_service = Arc::new(NotificationService::new(
        users.clone(),
        Arc::new(FailingNotificationStore),
        NotificationConfig::default(),
    ));
    let affinity_service = Arc::new(AffinityService::new(affinity_store.clone()));

    let actor = Uuid::new_v4();
    let owner = Uuid::new_v4();
    users.insert_plain_user(owner);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(affinity_service.clone()))
            .configure(register_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/engagement")
        .set_json(serde_json::json!({
            "actor_id": actor,
            "target_user_id": owner,
            "event_type": "like",
            "post_id": Uuid::new_v4(),
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["notification"], "failed");
    assert_eq!(body["affinity"], "recorded");
    assert_eq!(affinity_store.score(actor, owner), Some(5));
}

#[tokio::test]
async fn suppressed_notification_does_not_block_affinity() {
    // Views never notify, yet they still move the score.
    let fx = fixture();
    let actor = Uuid::new_v4();
    let owner = Uuid::new_v4();
    fx.users.insert_plain_user(owner);

    assert_eq!(NotificationType::parse("view"), None);
    fx.affinity_service
        .record_interaction(actor, owner, InteractionKind::View)
        .await
        .unwrap();

    assert!(fx.notifications.all().is_empty());
    assert_eq!(fx.affinity.score(actor, owner), Some(1));
}
