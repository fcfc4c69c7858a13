use crate::prelude::{Timestamp, Timestamped};
use serde::{Deserialize, Serialize};

/// A rapid eye movement between two fixations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Saccade {
    pub timestamp: Timestamp,
    /// Degrees of visual angle.
    pub amplitude: f64,
    /// Direction in degrees, `[0, 360)`.
    #[serde(rename = "absoluteAngle", alias = "absolute_angle")]
    pub absolute_angle: f64,
}

impl Saccade {
    pub fn new(timestamp: Timestamp, amplitude: f64, absolute_angle: f64) -> Self {
        Self {
            timestamp,
            amplitude,
            absolute_angle,
        }
    }
}

impl Timestamped for Saccade {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saccade_reads_camel_case_angle() {
        let saccade: Saccade =
            serde_json::from_str(r#"{"timestamp": 12, "amplitude": 1.5, "absoluteAngle": 270.0}"#)
                .unwrap();
        assert_eq!(saccade, Saccade::new(12, 1.5, 270.0));
    }
}
