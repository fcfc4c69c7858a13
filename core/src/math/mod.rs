pub mod angle;
pub mod binning;
pub mod stats;

pub use angle::{Direction, DirectionCounts, RadarClassifier, RadarHistogram, RadarSector};
pub use binning::RangeBinner;
pub use stats::StatsHelper;
