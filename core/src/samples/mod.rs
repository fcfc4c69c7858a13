pub mod fixation;
pub mod saccade;

pub use fixation::Fixation;
pub use saccade::Saccade;
