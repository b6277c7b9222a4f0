pub mod engagement;
pub mod feed;
pub mod notifications;
