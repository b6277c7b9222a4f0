pub mod affinity;
pub mod notifications;
pub mod posts;
pub mod users;

pub use affinity::PgAffinityStore;
pub use notifications::PgNotificationStore;
pub use posts::PgPostStore;
pub use users::PgUserStore;
