//! Small value types with no natural home in any single codec or component.

mod duration;
mod item_queue;
mod recent_history;
mod stats;

pub use duration::DurationSinceUnixEpoch;
pub use item_queue::{ItemQueue, ItemQueueError};
pub use recent_history::RecentHistory;
pub use stats::{StatsCounters, StatsError};
