pub mod backend;
pub mod store;

pub use backend::{CacheBackend, CacheStore, JsonFileBackend, MemoryBackend, TrialMap};
pub use store::{GroundTruth, ReconcileReport, ResultCache, TrialKey};

/// A cached per-trial record. The cache reads nothing but its type tag.
pub trait CacheRecord {
    fn kind(&self) -> &str;
}
