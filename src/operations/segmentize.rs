use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::geometry::{Polyline, SegmentSet};

const STAGE: &str = "segmentize";

/// Which input features a segmentation pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSubset {
    #[default]
    All,
    Even,
    Odd,
}

impl FeatureSubset {
    fn contains(self, index: usize) -> bool {
        match self {
            Self::All => true,
            Self::Even => index % 2 == 0,
            Self::Odd => index % 2 == 1,
        }
    }
}

/// Breaks polylines into straight segments.
///
/// Each part is walked vertex by vertex. A vertex equal to its predecessor
/// is skipped, every other vertex closes a segment with the previous kept
/// vertex. Parts with fewer than two distinct vertices contribute nothing.
///
/// Segment ids are assigned in emission order starting at `0`. Owner
/// indices refer to positions in the full input, also when only a subset of
/// features is read.
#[derive(Debug)]
pub struct Segmentize<'a> {
    polylines: &'a [Polyline],
    subset: FeatureSubset,
    cancel: CancelToken,
}

impl<'a> Segmentize<'a> {
    /// Creates a segmentation pass over all features.
    #[must_use]
    pub fn new(polylines: &'a [Polyline]) -> Self {
        Self {
            polylines,
            subset: FeatureSubset::All,
            cancel: CancelToken::default(),
        }
    }

    /// Restricts the pass to a subset of features.
    #[must_use]
    pub fn with_subset(mut self, subset: FeatureSubset) -> Self {
        self.subset = subset;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes the segmentation.
    ///
    /// # Errors
    ///
    /// - `GeometryError::NonFinite` if a read feature has a NaN or infinite
    ///   coordinate
    /// - `ParlinesError::Cancelled` if the run is cancelled
    pub fn execute(&self) -> Result<SegmentSet> {
        let mut set = SegmentSet::new();

        for (owner, polyline) in self.polylines.iter().enumerate() {
            self.cancel.check(STAGE)?;
            if !self.subset.contains(owner) {
                continue;
            }
            polyline.ensure_finite(owner)?;

            for (part, points) in polyline.parts().iter().enumerate() {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                let mut previous = *first;
                for &point in rest {
                    if point == previous {
                        continue;
                    }
                    set.push(previous, point, owner, part);
                    previous = point;
                }
            }
        }

        debug!(
            features = self.polylines.len(),
            subset = ?self.subset,
            segments = set.len(),
            "segmented polylines"
        );
        Ok(set)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, ParlinesError};
    use crate::geometry::SegmentId;
    use crate::math::Point2;

    fn endpoints(set: &SegmentSet) -> Vec<((f64, f64), (f64, f64))> {
        set.iter()
            .map(|s| ((s.start().x, s.start().y), (s.end().x, s.end().y)))
            .collect()
    }

    #[test]
    fn consecutive_pairs_become_segments() {
        let lines = vec![Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])];
        let set = Segmentize::new(&lines).execute().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            endpoints(&set),
            vec![((0.0, 0.0), (1.0, 0.0)), ((1.0, 0.0), (1.0, 1.0))]
        );
    }

    #[test]
    fn duplicate_vertices_are_skipped() {
        let with_dups = vec![Polyline::from_xy(&[
            (0.0, 0.0),
            (0.0, 0.0),
            (2.0, 1.0),
            (2.0, 1.0),
            (2.0, 1.0),
            (4.0, 0.0),
        ])];
        let without = vec![Polyline::from_xy(&[(0.0, 0.0), (2.0, 1.0), (4.0, 0.0)])];
        let a = Segmentize::new(&with_dups).execute().unwrap();
        let b = Segmentize::new(&without).execute().unwrap();
        assert_eq!(endpoints(&a), endpoints(&b));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn degenerate_parts_yield_nothing() {
        let lines = vec![
            Polyline::from_parts(vec![vec![]]),
            Polyline::from_xy(&[(3.0, 3.0)]),
            Polyline::from_xy(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]),
        ];
        let set = Segmentize::new(&lines).execute().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn parts_are_independent() {
        let lines = vec![Polyline::from_parts(vec![
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)],
            vec![Point2::new(5.0, 5.0), Point2::new(6.0, 5.0)],
        ])];
        let set = Segmentize::new(&lines).execute().unwrap();
        // No bridging segment from (1,0) to (5,5).
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(SegmentId(1)).unwrap().part(), 1);
    }

    #[test]
    fn ids_follow_emission_order() {
        let lines = vec![
            Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
            Polyline::from_xy(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]),
        ];
        let set = Segmentize::new(&lines).execute().unwrap();
        let owners: Vec<_> = set.iter().map(|s| (s.id().index(), s.owner())).collect();
        assert_eq!(owners, vec![(0, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn subsets_keep_source_owner() {
        let lines = vec![
            Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
            Polyline::from_xy(&[(0.0, 5.0), (1.0, 5.0)]),
            Polyline::from_xy(&[(0.0, 9.0), (1.0, 9.0)]),
        ];
        let even = Segmentize::new(&lines)
            .with_subset(FeatureSubset::Even)
            .execute()
            .unwrap();
        let odd = Segmentize::new(&lines)
            .with_subset(FeatureSubset::Odd)
            .execute()
            .unwrap();
        assert_eq!(even.iter().map(|s| s.owner()).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(odd.iter().map(|s| s.owner()).collect::<Vec<_>>(), vec![1]);
        assert_eq!(odd.get(SegmentId(0)).unwrap().owner(), 1);
    }

    #[test]
    fn non_finite_geometry_is_reported() {
        let lines = vec![
            Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
            Polyline::from_xy(&[(0.0, 0.0), (f64::NAN, 1.0)]),
        ];
        let err = Segmentize::new(&lines).execute().unwrap_err();
        assert!(matches!(
            err,
            ParlinesError::Geometry(GeometryError::NonFinite {
                geometry: 1,
                part: 0,
                vertex: 1
            })
        ));
    }

    #[test]
    fn cancelled_before_start() {
        let lines = vec![Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)])];
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = Segmentize::new(&lines).with_cancel(cancel).execute().unwrap_err();
        assert!(matches!(err, ParlinesError::Cancelled { .. }));
    }
}
