//! Durable key-value persistence for the tracker snapshot. The tracker
//! only ever needs `load`/`save` of one string blob under a fixed key, so
//! backends stay deliberately small.

mod file;
mod memory;
mod sqlite;

use anyhow::Result;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A durable key-value surface. Implementations must treat `save` as
/// atomic per key; a failed call leaves the previous value readable.
pub trait DurableStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> Result<()>;
}
