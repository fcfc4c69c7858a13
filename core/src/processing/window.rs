//! Fixed-duration time windows over an ascending sample stream.
//!
//! The span between the first and last sample is divided into
//! `round(span / window_length)` windows (at least one). Each window is one
//! tick wider than the exact division so a sample sitting on a nominal edge
//! stays in the earlier window. Windows are reduced by a caller-supplied
//! function that sees the window's samples as a contiguous slice.

use crate::prelude::{GapPolicy, StatsError, StatsResult, Timestamped, TICKS_PER_SECOND};
use serde::{Deserialize, Serialize};

/// Chronological per-window aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram<T> {
    pub values: Vec<T>,
    /// Realized window duration in seconds.
    #[serde(rename = "itemDuration", alias = "item_duration")]
    pub item_duration: f64,
}

impl<T> Histogram<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Window layout derived from the first and last timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPlan {
    pub start: f64,
    pub window_count: u64,
    /// Ticks per window, including the one-tick edge pad.
    pub item_duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindowAggregator {
    window_length_secs: f64,
    gap_policy: GapPolicy,
}

impl TimeWindowAggregator {
    pub fn new(window_length_secs: f64) -> StatsResult<Self> {
        if !window_length_secs.is_finite() || window_length_secs <= 0.0 {
            return Err(StatsError::PreconditionViolation(format!(
                "window length must be a positive number of seconds, got {}",
                window_length_secs
            )));
        }
        Ok(Self {
            window_length_secs,
            gap_policy: GapPolicy::default(),
        })
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn plan<S: Timestamped>(&self, samples: &[S]) -> StatsResult<WindowPlan> {
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (first.timestamp(), last.timestamp()),
            _ => {
                return Err(StatsError::PreconditionViolation(
                    "cannot window an empty sample sequence".into(),
                ))
            }
        };
        if let Some(position) = samples
            .windows(2)
            .position(|pair| pair[1].timestamp() < pair[0].timestamp())
        {
            return Err(StatsError::PreconditionViolation(format!(
                "timestamps must be ascending (sample {} precedes sample {})",
                position + 1,
                position
            )));
        }

        let span = (last - first) as f64;
        let window_count = (span / (self.window_length_secs * TICKS_PER_SECOND))
            .round()
            .max(1.0) as u64;

        Ok(WindowPlan {
            start: first as f64,
            window_count,
            item_duration: span / window_count as f64 + 1.0,
        })
    }

    /// Reduces each window of `samples` with `reducer`.
    ///
    /// `samples` must be non-empty and ascending by timestamp.
    pub fn aggregate<S, T, F>(&self, samples: &[S], mut reducer: F) -> StatsResult<Histogram<T>>
    where
        S: Timestamped,
        F: FnMut(&[S]) -> T,
    {
        let plan = self.plan(samples)?;

        // Collapse never closes more windows than there are samples, and the
        // plan can be astronomically large for tiny window lengths.
        let reserve = plan.window_count.min(samples.len() as u64 + 1);
        let mut values = Vec::with_capacity(reserve as usize);
        let mut window_start = 0;
        let mut upper_edge = plan.start + plan.item_duration;

        for (index, sample) in samples.iter().enumerate() {
            let timestamp = sample.timestamp() as f64;
            if timestamp > upper_edge {
                values.push(reducer(&samples[window_start..index]));
                window_start = index;
                upper_edge += plan.item_duration;

                if self.gap_policy == GapPolicy::EmitEmpty {
                    while timestamp > upper_edge {
                        values.push(reducer(&[]));
                        upper_edge += plan.item_duration;
                    }
                }
            }
        }
        values.push(reducer(&samples[window_start..]));

        Ok(Histogram {
            values,
            item_duration: plan.item_duration / TICKS_PER_SECOND,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Timestamp;

    #[derive(Debug, Clone, Copy)]
    struct Tick(Timestamp);

    impl Timestamped for Tick {
        fn timestamp(&self) -> Timestamp {
            self.0
        }
    }

    fn ticks(timestamps: &[Timestamp]) -> Vec<Tick> {
        timestamps.iter().copied().map(Tick).collect()
    }

    fn count(window: &[Tick]) -> usize {
        window.len()
    }

    #[test]
    fn splits_even_span_into_rounded_window_count() {
        let aggregator = TimeWindowAggregator::new(1.0).unwrap();
        let samples = ticks(&[0, 500_000, 1_000_000, 1_500_000, 2_000_000, 3_000_000]);
        let histogram = aggregator.aggregate(&samples, count).unwrap();

        // 3 s span -> 3 windows of 1_000_001 ticks; 1_000_000 sits inside the first.
        assert_eq!(histogram.values, vec![3, 2, 1]);
        assert!((histogram.item_duration - 1.000001).abs() < 1e-12);
    }

    #[test]
    fn window_counts_sum_to_sample_count() {
        let mut timestamps: Vec<Timestamp> =
            (0..500).map(|i| i * i * 37 + (i % 7) * 1_000).collect();
        timestamps.sort_unstable();
        let samples = ticks(&timestamps);
        for window in [0.05, 0.3, 1.0, 2.5, 60.0] {
            for policy in [GapPolicy::Collapse, GapPolicy::EmitEmpty] {
                let aggregator = TimeWindowAggregator::new(window)
                    .unwrap()
                    .with_gap_policy(policy);
                let histogram = aggregator.aggregate(&samples, count).unwrap();
                assert_eq!(histogram.values.iter().sum::<usize>(), samples.len());
            }
        }
    }

    #[test]
    fn identical_timestamps_yield_one_window() {
        let aggregator = TimeWindowAggregator::new(1.0).unwrap();
        let samples = ticks(&[42, 42, 42]);
        let histogram = aggregator.aggregate(&samples, count).unwrap();
        assert_eq!(histogram.values, vec![3]);
        assert!((histogram.item_duration - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn single_sample_yields_one_window() {
        let aggregator = TimeWindowAggregator::new(5.0).unwrap();
        let histogram = aggregator.aggregate(&ticks(&[7]), count).unwrap();
        assert_eq!(histogram.values, vec![1]);
    }

    #[test]
    fn far_sample_collapses_skipped_windows() {
        let aggregator = TimeWindowAggregator::new(1.0).unwrap();
        let samples = ticks(&[0, 100, 4_500_000, 5_000_000]);
        let histogram = aggregator.aggregate(&samples, count).unwrap();
        // 5 windows planned, but each overflowing sample closes only one.
        assert_eq!(histogram.values, vec![2, 1, 1]);
    }

    #[test]
    fn emit_empty_policy_keeps_skipped_windows() {
        let aggregator = TimeWindowAggregator::new(1.0)
            .unwrap()
            .with_gap_policy(GapPolicy::EmitEmpty);
        let samples = ticks(&[0, 100, 4_500_000, 5_000_000]);
        let histogram = aggregator.aggregate(&samples, count).unwrap();
        assert_eq!(histogram.values, vec![2, 0, 0, 0, 2]);
        assert_eq!(histogram.len() as u64, aggregator.plan(&samples).unwrap().window_count);
    }

    #[test]
    fn tiny_window_length_keeps_count_invariant() {
        let samples = ticks(&[0, 1_000_000]);
        for window in [1e-300, 1e-7] {
            let aggregator = TimeWindowAggregator::new(window).unwrap();
            let histogram = aggregator.aggregate(&samples, count).unwrap();
            assert_eq!(histogram.values, vec![1, 1]);
        }

        let aggregator = TimeWindowAggregator::new(1e-300)
            .unwrap()
            .with_gap_policy(GapPolicy::EmitEmpty);
        let samples = ticks(&[0, 10, 20]);
        let histogram = aggregator.aggregate(&samples, count).unwrap();
        assert_eq!(histogram.values.iter().sum::<usize>(), 3);
        assert!(histogram.len() > 3);
    }

    #[test]
    fn rejects_empty_and_unordered_input() {
        let aggregator = TimeWindowAggregator::new(1.0).unwrap();
        assert!(matches!(
            aggregator.aggregate(&ticks(&[]), count),
            Err(StatsError::PreconditionViolation(_))
        ));
        assert!(matches!(
            aggregator.aggregate(&ticks(&[10, 5]), count),
            Err(StatsError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn rejects_non_positive_window_length() {
        assert!(TimeWindowAggregator::new(0.0).is_err());
        assert!(TimeWindowAggregator::new(-1.0).is_err());
        assert!(TimeWindowAggregator::new(f64::NAN).is_err());
    }
}
