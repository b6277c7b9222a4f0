/// Configuration management for social-feed-service
///
/// Loads configuration from environment variables into typed sections that
/// are passed to services by constructor injection.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Auth configuration
    pub auth: AuthConfig,
    /// Feed ranking configuration
    pub feed: FeedConfig,
    /// Notification configuration
    pub notifications: NotificationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for Bearer token validation
    pub jwt_secret: String,
}

/// Feed ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size when the request does not specify one
    #[serde(default = "default_feed_limit")]
    pub default_limit: i64,
    /// Upper bound on requested page size
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
    /// How many top-affinity targets feed ranking considers
    #[serde(default = "default_affinity_top_k")]
    pub affinity_top_k: i64,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Page size when the request does not specify one
    #[serde(default = "default_notification_limit")]
    pub default_limit: i64,
    /// Upper bound on requested page size
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
    /// Dedup window: repeated events with the same key within this many
    /// seconds merge into one notification
    #[serde(default = "default_dedup_window_secs")]
    pub dedup_window_secs: i64,
}

// Default values
fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_feed_limit() -> i64 {
    10
}

fn default_notification_limit() -> i64 {
    20
}

fn default_max_limit() -> i64 {
    50
}

fn default_affinity_top_k() -> i64 {
    10
}

fn default_dedup_window_secs() -> i64 {
    3600
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable not set")?,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_connections),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_min_connections),
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable not set")?,
        };

        let feed = FeedConfig {
            default_limit: std::env::var("FEED_DEFAULT_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_feed_limit),
            max_limit: std::env::var("FEED_MAX_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_limit),
            affinity_top_k: std::env::var("FEED_AFFINITY_TOP_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_affinity_top_k),
        };

        let notifications = NotificationConfig {
            default_limit: std::env::var("NOTIFICATION_DEFAULT_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_notification_limit),
            max_limit: std::env::var("NOTIFICATION_MAX_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_limit),
            dedup_window_secs: std::env::var("NOTIFICATION_DEDUP_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_dedup_window_secs),
        };

        Ok(Config {
            app,
            database,
            auth,
            feed,
            notifications,
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_feed_limit(),
            max_limit: default_max_limit(),
            affinity_top_k: default_affinity_top_k(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_notification_limit(),
            max_limit: default_max_limit(),
            dedup_window_secs: default_dedup_window_secs(),
        }
    }
}
