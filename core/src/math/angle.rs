//! Directional classification of saccade angles.
//!
//! Two independent views of the same angle: a coarse reading-direction
//! split (forward / backward / other) and an N-sector radar histogram.

use crate::prelude::{StatsError, StatsResult};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Other,
}

impl Direction {
    /// Forward is `(315, 360) ∪ [0, 45)`, backward is `(135, 225)`.
    /// The boundary angles 45, 135, 225 and 315 are `Other`.
    pub fn classify(angle: f64) -> Self {
        if angle > 315.0 || angle < 45.0 {
            Direction::Forward
        } else if angle > 135.0 && angle < 225.0 {
            Direction::Backward
        } else {
            Direction::Other
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionCounts {
    pub forward: u32,
    pub backward: u32,
    pub other: u32,
}

impl DirectionCounts {
    pub fn from_angles<I>(angles: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut counts = Self::default();
        for angle in angles {
            counts.record(Direction::classify(angle));
        }
        counts
    }

    pub fn record(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => self.forward += 1,
            Direction::Backward => self.backward += 1,
            Direction::Other => self.other += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.forward + self.backward + self.other
    }
}

/// One radar wedge, labelled by its center angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarSector {
    pub angle: f64,
    pub value: u32,
}

/// Sector counts in ascending center-angle order.
///
/// Serialized as an object keyed by center degree, e.g. `{"0": 2, "45": 1}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarHistogram {
    pub sectors: Vec<RadarSector>,
}

impl RadarHistogram {
    pub fn total(&self) -> u32 {
        self.sectors.iter().map(|s| s.value).sum()
    }
}

impl Serialize for RadarHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.sectors.iter().map(|s| (s.angle.to_string(), s.value)))
    }
}

impl<'de> Deserialize<'de> for RadarHistogram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
        let mut sectors = raw
            .into_iter()
            .map(|(key, value)| {
                key.parse::<f64>()
                    .map(|angle| RadarSector { angle, value })
                    .map_err(|_| {
                        <D::Error as de::Error>::custom(format!("invalid radar angle {:?}", key))
                    })
            })
            .collect::<Result<Vec<_>, D::Error>>()?;
        sectors.sort_by(|a, b| a.angle.total_cmp(&b.angle));
        Ok(Self { sectors })
    }
}

/// Equal-width radar sectors; sector 0 is centered on 0°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarClassifier {
    sectors: usize,
}

impl RadarClassifier {
    pub fn new(sectors: usize) -> StatsResult<Self> {
        if sectors == 0 {
            return Err(StatsError::PreconditionViolation(
                "radar needs at least one sector".into(),
            ));
        }
        Ok(Self { sectors })
    }

    pub fn sector_width(&self) -> f64 {
        360.0 / self.sectors as f64
    }

    pub fn sector_index(&self, angle: f64) -> usize {
        let width = self.sector_width();
        let raw = ((angle + width / 2.0) / width).floor() as i64;
        raw.rem_euclid(self.sectors as i64) as usize
    }

    pub fn counts<I>(&self, angles: I) -> RadarHistogram
    where
        I: IntoIterator<Item = f64>,
    {
        let width = self.sector_width();
        let mut sectors: Vec<RadarSector> = (0..self.sectors)
            .map(|i| RadarSector {
                angle: i as f64 * width,
                value: 0,
            })
            .collect();
        for angle in angles {
            sectors[self.sector_index(angle)].value += 1;
        }
        RadarHistogram { sectors }
    }
}
