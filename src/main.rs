use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_feed_service::{
    handlers::{
        engagement::register_routes as register_engagement,
        feed::register_routes as register_feed,
        notifications::register_routes as register_notifications,
    },
    middleware::JwtAuthMiddleware,
    repository::{PgAffinityStore, PgNotificationStore, PgPostStore, PgUserStore},
    AffinityService, Config, FeedService, NotificationService,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting social-feed-service");

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("config error: {}", e)))?;

    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Successfully connected to database");
            pool
        }
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "Database connection failed",
            ));
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migration error: {}", e)))?;

    let user_store = Arc::new(PgUserStore::new(db_pool.clone()));
    let post_store = Arc::new(PgPostStore::new(db_pool.clone()));
    let notification_store = Arc::new(PgNotificationStore::new(db_pool.clone()));
    let affinity_store = Arc::new(PgAffinityStore::new(db_pool));

    let feed_service = Arc::new(FeedService::new(
        user_store.clone(),
        post_store,
        affinity_store.clone(),
        config.feed.clone(),
    ));
    let notification_service = Arc::new(NotificationService::new(
        user_store,
        notification_store,
        config.notifications.clone(),
    ));
    let affinity_service = Arc::new(AffinityService::new(affinity_store));

    let jwt_secret = config.auth.jwt_secret.clone();
    let addr = format!("{}:{}", config.app.host, config.app.http_port);
    tracing::info!("Starting HTTP server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(feed_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(affinity_service.clone()))
            .wrap(actix_middleware::Logger::default())
            .route("/health", web::get().to(|| async { "OK" }))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
                    .configure(register_feed)
                    .configure(register_notifications),
            )
            .service(web::scope("/internal/v1").configure(register_engagement))
    })
    .bind(&addr)?
    .run()
    .await
}
