use crate::prelude::{Timestamp, Timestamped};
use serde::{Deserialize, Serialize};

/// A period of stationary gaze.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixation {
    pub timestamp: Timestamp,
    /// Microseconds.
    pub duration: u64,
}

impl Fixation {
    pub fn new(timestamp: Timestamp, duration: u64) -> Self {
        Self {
            timestamp,
            duration,
        }
    }
}

impl Timestamped for Fixation {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
