pub mod affinity;
pub mod feed;
pub mod notification;
pub mod ranker;

pub use affinity::AffinityService;
pub use feed::FeedService;
pub use notification::{NotificationService, NotifyInput};
pub use ranker::{RankContext, RankedPost};
