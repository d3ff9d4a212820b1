pub mod recording;
pub mod time;
pub mod timeline;

pub use recording::{
    Marble, Notification, OrderCoordinator, RecordedNotification, RecordedSubscription,
    TimeRegression,
};
pub use time::TimePoint;
pub use timeline::{Timeline, TimelineEvent};
