mod interaction;
mod snapshot;
mod video;

pub use interaction::{InteractionKind, InteractionRecord};
pub(crate) use interaction::payload;
pub use snapshot::TrackerSnapshot;
pub use video::{VideoWatchState, WatchSession};
