pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod security;
pub mod services;
pub mod stores;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{AffinityService, FeedService, NotificationService};
