pub mod polyline;
pub mod segment;

pub use polyline::{LineDataset, Polyline};
pub use segment::{Segment, SegmentId, SegmentSet};
