//! Eye-movement statistics core.
//!
//! Turns ascending fixation and saccade streams into windowed histograms,
//! range distributions and directional counts, and keeps a persisted
//! per-trial cache of those results in step with the trials that exist.

pub mod cache;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod samples;
pub mod telemetry;

pub use cache::{CacheRecord, ResultCache};
pub use prelude::{StatsConfig, StatsError, StatsResult};
pub use processing::{TrialAnalyzer, TrialStatistics};
