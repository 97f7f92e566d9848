pub mod cancel;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod math;
pub mod operations;

pub use cancel::CancelToken;
pub use config::{MatchParams, PairSelection, SetAssignment};
pub use error::{ParlinesError, Result};
pub use geometry::{LineDataset, Polyline, Segment, SegmentId, SegmentSet};
pub use operations::{FindParallelSegments, MatchOutcome, ResultRecord};
