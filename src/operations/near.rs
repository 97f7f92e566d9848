//! Proximity search between two segment sets.
//!
//! Set B is bulk-loaded into an R-tree keyed by segment bounding boxes. Each
//! segment of set A queries the tree with its own bounding box grown by the
//! search radius, and only the returned candidates get an exact
//! segment-to-segment distance.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rstar::{RTree, RTreeObject, AABB};
use serde::Serialize;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::config::validate_search_distance;
use crate::error::Result;
use crate::geometry::{Segment, SegmentId, SegmentSet};
use crate::math::distance_2d::segment_to_segment_dist;
use crate::math::Point2;

const STAGE: &str = "find_near";

/// One `(from, to)` pair within the search radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProximityRecord {
    /// Segment of set A.
    pub from: SegmentId,
    /// Segment of set B.
    pub to: SegmentId,
    /// Exact minimum distance; `0` when the segments touch.
    pub distance: f64,
    /// 1-based position among the records sharing `from`, nearest first.
    pub rank: u32,
}

/// A segment as stored in the R-tree.
#[derive(Debug, Clone)]
struct IndexedSegment {
    id: SegmentId,
    start: Point2,
    end: Point2,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.start.x, self.start.y], [self.end.x, self.end.y])
    }
}

/// Read-only spatial index over one segment set.
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    /// Bulk-loads every segment of `set`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFiniteSegment` for the first segment with a
    /// NaN or infinite coordinate; such a segment has no valid envelope.
    pub fn new(set: &SegmentSet) -> Result<Self> {
        set.iter().try_for_each(Segment::ensure_finite)?;
        let indexed = set
            .iter()
            .map(|s| IndexedSegment {
                id: s.id(),
                start: *s.start(),
                end: *s.end(),
            })
            .collect();
        Ok(Self {
            tree: RTree::bulk_load(indexed),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Returns `(id, distance)` for every indexed segment within `radius` of
    /// `segment`, ordered by distance then id.
    #[must_use]
    pub fn within(&self, segment: &Segment, radius: f64) -> Vec<(SegmentId, f64)> {
        let ([min_x, min_y], [max_x, max_y]) = segment.bounds();
        let query = AABB::from_corners(
            [min_x - radius, min_y - radius],
            [max_x + radius, max_y + radius],
        );

        let mut hits: Vec<(SegmentId, f64)> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .filter_map(|candidate| {
                let d = segment_to_segment_dist(
                    segment.start(),
                    segment.end(),
                    &candidate.start,
                    &candidate.end,
                );
                (d <= radius).then_some((candidate.id, d))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}

/// Finds, for every segment of set A, all segments of set B within a radius.
///
/// Records are ordered by `from`, then by rank. Records with distance `0`
/// are kept; the angle stage drops them.
#[derive(Debug)]
pub struct FindNear<'a> {
    from: &'a SegmentSet,
    to: &'a SegmentSet,
    radius: f64,
    cancel: CancelToken,
}

impl<'a> FindNear<'a> {
    #[must_use]
    pub fn new(from: &'a SegmentSet, to: &'a SegmentSet, radius: f64) -> Self {
        Self {
            from,
            to,
            radius,
            cancel: CancelToken::default(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes the proximity search.
    ///
    /// # Errors
    ///
    /// - `ConfigError::OutOfRange` if the radius is negative or not finite
    /// - `GeometryError::NonFiniteSegment` if either set holds a NaN or
    ///   infinite coordinate
    /// - `ParlinesError::Cancelled` if the run is cancelled
    pub fn execute(&self) -> Result<Vec<ProximityRecord>> {
        validate_search_distance(self.radius)?;

        self.from.iter().try_for_each(Segment::ensure_finite)?;
        let index = SegmentIndex::new(self.to)?;

        #[cfg(feature = "parallel")]
        let per_segment: Vec<Vec<ProximityRecord>> = self
            .from
            .as_slice()
            .par_iter()
            .map(|segment| self.near_segment(&index, segment))
            .collect::<Result<_>>()?;

        #[cfg(not(feature = "parallel"))]
        let per_segment: Vec<Vec<ProximityRecord>> = self
            .from
            .iter()
            .map(|segment| self.near_segment(&index, segment))
            .collect::<Result<_>>()?;

        let records: Vec<ProximityRecord> = per_segment.into_iter().flatten().collect();
        debug!(
            from = self.from.len(),
            to = index.len(),
            radius = self.radius,
            records = records.len(),
            "built near table"
        );
        Ok(records)
    }

    fn near_segment(
        &self,
        index: &SegmentIndex,
        segment: &Segment,
    ) -> Result<Vec<ProximityRecord>> {
        self.cancel.check(STAGE)?;
        Ok(index
            .within(segment, self.radius)
            .into_iter()
            .zip(1_u32..)
            .map(|((to, distance), rank)| ProximityRecord {
                from: segment.id(),
                to,
                distance,
                rank,
            })
            .collect())
    }
}
