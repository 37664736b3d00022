//! Local storage for drafts.

mod file;
mod memory;
mod traits;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use traits::{CacheStorage, CacheStorageExt};
