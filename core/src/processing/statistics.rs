use crate::cache::CacheRecord;
use crate::math::{
    Direction, DirectionCounts, RadarClassifier, RadarHistogram, RangeBinner, StatsHelper,
};
use crate::prelude::{StatsConfig, StatsResult};
use crate::processing::window::{Histogram, TimeWindowAggregator};
use crate::samples::{Fixation, Saccade};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Windowed forward/backward/other saccade counts as parallel series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionTimeline {
    pub forward: Vec<u32>,
    pub backward: Vec<u32>,
    pub other: Vec<u32>,
    #[serde(rename = "itemDuration", alias = "item_duration")]
    pub item_duration: f64,
}

impl From<Histogram<DirectionCounts>> for DirectionTimeline {
    fn from(histogram: Histogram<DirectionCounts>) -> Self {
        Self {
            forward: histogram.values.iter().map(|c| c.forward).collect(),
            backward: histogram.values.iter().map(|c| c.backward).collect(),
            other: histogram.values.iter().map(|c| c.other).collect(),
            item_duration: histogram.item_duration,
        }
    }
}

/// Amplitude bucket counts for forward and backward saccades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmplitudeRanges {
    pub forward: Vec<u32>,
    pub backward: Vec<u32>,
}

/// Computed statistics for one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialStatistics {
    #[serde(rename = "type")]
    pub kind: String,
    pub fix_durations_range: Vec<u32>,
    pub fix_durations_time: Option<Histogram<u64>>,
    pub saccade_directions: Option<DirectionTimeline>,
    pub saccade_direction_radar: RadarHistogram,
    pub saccade_amplitude_range: AmplitudeRanges,
    pub saccade_amplitude_time: Option<Histogram<f64>>,
}

impl CacheRecord for TrialStatistics {
    fn kind(&self) -> &str {
        &self.kind
    }
}

/// Composes the binners, classifiers and window aggregator into per-trial
/// statistics.
pub struct TrialAnalyzer {
    aggregator: TimeWindowAggregator,
    fixation_ranges: RangeBinner,
    amplitude_ranges: RangeBinner,
    radar: RadarClassifier,
    logger: LogManager,
}

impl TrialAnalyzer {
    pub fn new(config: &StatsConfig) -> StatsResult<Self> {
        Ok(Self {
            aggregator: TimeWindowAggregator::new(config.window_length_secs)?
                .with_gap_policy(config.gap_policy),
            fixation_ranges: RangeBinner::new(config.fixation_duration_bounds_us.clone())?,
            amplitude_ranges: RangeBinner::new(config.saccade_amplitude_bounds_deg.clone())?,
            radar: RadarClassifier::new(config.radar_sectors)?,
            logger: LogManager::new("analyzer"),
        })
    }

    pub fn fixation_duration_ranges(&self, fixations: &[Fixation]) -> Vec<u32> {
        self.fixation_ranges.counts(fixations.iter().map(|f| f.duration as f64))
    }

    /// Rounded mean fixation duration per window.
    pub fn fixation_duration_timeline(
        &self,
        fixations: &[Fixation],
    ) -> StatsResult<Histogram<u64>> {
        self.aggregator.aggregate(fixations, |window| {
            StatsHelper::mean(window.iter().map(|f| f.duration as f64)).round() as u64
        })
    }

    pub fn saccade_direction_timeline(
        &self,
        saccades: &[Saccade],
    ) -> StatsResult<DirectionTimeline> {
        self.aggregator
            .aggregate(saccades, |window| {
                DirectionCounts::from_angles(window.iter().map(|s| s.absolute_angle))
            })
            .map(DirectionTimeline::from)
    }

    pub fn saccade_direction_radar(&self, saccades: &[Saccade]) -> RadarHistogram {
        self.radar.counts(saccades.iter().map(|s| s.absolute_angle))
    }

    /// Saccades classified as `Other` are left out of both series.
    pub fn saccade_amplitude_ranges(&self, saccades: &[Saccade]) -> AmplitudeRanges {
        let amplitudes_towards = |wanted: Direction| {
            self.amplitude_ranges.counts(
                saccades
                    .iter()
                    .filter(move |s| Direction::classify(s.absolute_angle) == wanted)
                    .map(|s| s.amplitude),
            )
        };
        AmplitudeRanges {
            forward: amplitudes_towards(Direction::Forward),
            backward: amplitudes_towards(Direction::Backward),
        }
    }

    pub fn saccade_amplitude_timeline(
        &self,
        saccades: &[Saccade],
    ) -> StatsResult<Histogram<f64>> {
        self.aggregator.aggregate(saccades, |window| {
            StatsHelper::mean(window.iter().map(|s| s.amplitude))
        })
    }

    /// Builds the full record. An empty fixation or saccade stream leaves the
    /// matching timelines unset instead of failing the trial.
    pub fn analyze(
        &self,
        kind: &str,
        fixations: &[Fixation],
        saccades: &[Saccade],
    ) -> StatsResult<TrialStatistics> {
        let (fix_durations_time, saccade_directions, saccade_amplitude_time) = (
            non_empty(fixations)
                .map(|f| self.fixation_duration_timeline(f))
                .transpose()?,
            non_empty(saccades)
                .map(|s| self.saccade_direction_timeline(s))
                .transpose()?,
            non_empty(saccades)
                .map(|s| self.saccade_amplitude_timeline(s))
                .transpose()?,
        );

        self.logger.verbose(&format!(
            "{} fixations, {} saccades -> {} windows",
            fixations.len(),
            saccades.len(),
            fix_durations_time
                .as_ref()
                .map(Histogram::len)
                .or_else(|| saccade_amplitude_time.as_ref().map(Histogram::len))
                .unwrap_or(0)
        ));

        Ok(TrialStatistics {
            kind: kind.to_string(),
            fix_durations_range: self.fixation_duration_ranges(fixations),
            fix_durations_time,
            saccade_directions,
            saccade_direction_radar: self.saccade_direction_radar(saccades),
            saccade_amplitude_range: self.saccade_amplitude_ranges(saccades),
            saccade_amplitude_time,
        })
    }
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> TrialAnalyzer {
        let config = StatsConfig {
            window_length_secs: 1.0,
            fixation_duration_bounds_us: vec![200_000.0, 400_000.0],
            saccade_amplitude_bounds_deg: vec![2.0, 5.0],
            radar_sectors: 8,
            ..Default::default()
        };
        TrialAnalyzer::new(&config).unwrap()
    }

    fn fixations() -> Vec<Fixation> {
        vec![
            Fixation::new(0, 100_000),
            Fixation::new(400_000, 250_000),
            Fixation::new(1_200_000, 500_000),
            Fixation::new(2_000_000, 301_000),
        ]
    }

    fn saccades() -> Vec<Saccade> {
        vec![
            Saccade::new(0, 1.0, 10.0),
            Saccade::new(300_000, 3.0, 180.0),
            Saccade::new(900_000, 6.0, 350.0),
            Saccade::new(1_500_000, 4.0, 90.0),
            Saccade::new(2_000_000, 2.0, 200.0),
        ]
    }

    #[test]
    fn fixation_ranges_bucket_durations() {
        assert_eq!(analyzer().fixation_duration_ranges(&fixations()), vec![1, 2, 1]);
    }

    #[test]
    fn fixation_timeline_averages_per_window() {
        let timeline = analyzer().fixation_duration_timeline(&fixations()).unwrap();
        // 2 s span -> 2 windows; the first ends at 1_000_001.
        assert_eq!(timeline.values, vec![175_000, 400_500]);
    }

    #[test]
    fn direction_timeline_splits_into_series() {
        let timeline = analyzer().saccade_direction_timeline(&saccades()).unwrap();
        assert_eq!(timeline.forward, vec![2, 0]);
        assert_eq!(timeline.backward, vec![1, 1]);
        assert_eq!(timeline.other, vec![0, 1]);
    }

    #[test]
    fn amplitude_ranges_skip_other_directions() {
        let ranges = analyzer().saccade_amplitude_ranges(&saccades());
        assert_eq!(ranges.forward, vec![1, 0, 1]);
        assert_eq!(ranges.backward, vec![0, 2, 0]);
    }

    #[test]
    fn amplitude_timeline_averages_per_window() {
        let timeline = analyzer().saccade_amplitude_timeline(&saccades()).unwrap();
        assert_eq!(timeline.values, vec![10.0 / 3.0, 3.0]);
    }

    #[test]
    fn analyze_tolerates_missing_saccades() {
        let stats = analyzer().analyze("reading", &fixations(), &[]).unwrap();
        assert_eq!(stats.kind(), "reading");
        assert!(stats.fix_durations_time.is_some());
        assert!(stats.saccade_directions.is_none());
        assert!(stats.saccade_amplitude_time.is_none());
        assert_eq!(stats.saccade_direction_radar.total(), 0);
        assert_eq!(stats.saccade_direction_radar.sectors.len(), 8);
    }

    #[test]
    fn statistics_serialize_type_tag() {
        let stats = analyzer().analyze("search", &fixations(), &saccades()).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["type"], "search");
        assert!(json["fixDurationsTime"]["itemDuration"].is_number());
        assert_eq!(json["saccadeDirectionRadar"]["0"], 2);
        assert_eq!(json["saccadeDirectionRadar"]["180"], 2);
        assert_eq!(json["saccadeDirectionRadar"]["90"], 1);
        let back: TrialStatistics = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, stats.kind);
        assert_eq!(back.fix_durations_range, stats.fix_durations_range);
        assert_eq!(back.saccade_directions.map(|d| d.forward), Some(vec![2, 0]));
        assert_eq!(back.saccade_direction_radar, stats.saccade_direction_radar);
    }

    #[test]
    fn analyzer_rejects_bad_config() {
        let config = StatsConfig {
            radar_sectors: 0,
            ..Default::default()
        };
        assert!(TrialAnalyzer::new(&config).is_err());
    }
}
