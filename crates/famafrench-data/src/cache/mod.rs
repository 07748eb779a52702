//! Monthly cache of the cleaned factor table.

pub mod clock;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{Artifact, CacheConfig, CacheKey, CacheStatus, DatasetCache, default_cache_dir};
