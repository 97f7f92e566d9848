mod complete_pairs;
mod find_parallel;
mod near;
mod resolve_angles;
mod segmentize;

pub use complete_pairs::{nearest_per_segment, CompletePairs, ResultRecord, UNMATCHED};
pub use find_parallel::{FindParallelSegments, MatchOutcome};
pub use near::{FindNear, ProximityRecord, SegmentIndex};
pub use resolve_angles::{PairRecord, ResolveAngles};
pub use segmentize::{FeatureSubset, Segmentize};
