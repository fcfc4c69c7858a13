use serde::{Deserialize, Serialize};

/// Tracker clock ticks, microsecond convention.
pub type Timestamp = i64;

/// Ticks per second of the tracker clock.
pub const TICKS_PER_SECOND: f64 = 1_000_000.0;

/// Shared configuration for the statistics computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub window_length_secs: f64,
    pub fixation_duration_bounds_us: Vec<f64>,
    pub saccade_amplitude_bounds_deg: Vec<f64>,
    pub radar_sectors: usize,
    pub gap_policy: GapPolicy,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_length_secs: 10.0,
            fixation_duration_bounds_us: vec![150_000.0, 300_000.0, 500_000.0, 1_000_000.0],
            saccade_amplitude_bounds_deg: vec![1.0, 2.0, 4.0, 8.0],
            radar_sectors: 8,
            gap_policy: GapPolicy::Collapse,
        }
    }
}

/// How the window aggregator treats a sample that lands more than one
/// window past the currently open one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Close only the open window; skipped windows are folded into it.
    #[default]
    Collapse,
    /// Close the open window and emit one empty window per skipped edge.
    EmitEmpty,
}

/// Common error type for statistics and cache operations.
#[derive(thiserror::Error, Debug)]
pub enum StatsError {
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
    #[error("persistence failure: {0}")]
    Persistence(#[from] std::io::Error),
    #[error("malformed cache document: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StatsResult<T> = Result<T, StatsError>;

/// Anything carrying a tracker timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> Timestamp;
}
