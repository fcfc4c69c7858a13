pub mod statistics;
pub mod window;

pub use statistics::{AmplitudeRanges, DirectionTimeline, TrialAnalyzer, TrialStatistics};
pub use window::{Histogram, TimeWindowAggregator, WindowPlan};
