use serde::Serialize;
use tracing::debug;

use super::near::ProximityRecord;
use crate::cancel::CancelToken;
use crate::config::validate_angle_tolerance;
use crate::error::{OperationError, Result};
use crate::geometry::{SegmentId, SegmentSet};
use crate::math::angle_2d::{angle_difference, fold_angle_difference, is_parallel};

const STAGE: &str = "resolve_angles";

/// A near pair whose orientations agree within the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairRecord {
    pub from: SegmentId,
    pub to: SegmentId,
    pub distance: f64,
    pub rank: u32,
    pub from_angle: f64,
    pub to_angle: f64,
    /// Folded difference in `[0, 180)`, always below the tolerance.
    pub angle_diff: f64,
}

/// Attaches segment angles to near records and keeps the parallel ones.
///
/// Records with distance `0` (touching or overlapping segments) are skipped.
#[derive(Debug)]
pub struct ResolveAngles<'a> {
    records: &'a [ProximityRecord],
    from: &'a SegmentSet,
    to: &'a SegmentSet,
    tolerance: f64,
    cancel: CancelToken,
}

impl<'a> ResolveAngles<'a> {
    #[must_use]
    pub fn new(
        records: &'a [ProximityRecord],
        from: &'a SegmentSet,
        to: &'a SegmentSet,
        tolerance: f64,
    ) -> Self {
        Self {
            records,
            from,
            to,
            tolerance,
            cancel: CancelToken::default(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes the angle resolution.
    ///
    /// # Errors
    ///
    /// - `ConfigError::OutOfRange` if the tolerance is outside `[0, 180)`
    /// - `OperationError::Invariant` if a record names a segment missing from
    ///   its set
    /// - `ParlinesError::Cancelled` if the run is cancelled
    pub fn execute(&self) -> Result<Vec<PairRecord>> {
        validate_angle_tolerance(self.tolerance)?;

        let mut pairs = Vec::new();
        let mut separate = 0_usize;
        for record in self.records.iter().filter(|r| r.distance > 0.0) {
            self.cancel.check(STAGE)?;
            separate += 1;

            let from_angle = angle_of(self.from, record.from, "A")?;
            let to_angle = angle_of(self.to, record.to, "B")?;
            let raw = angle_difference(from_angle, to_angle);
            let diff = fold_angle_difference(raw, self.tolerance);

            if is_parallel(diff, self.tolerance) {
                pairs.push(PairRecord {
                    from: record.from,
                    to: record.to,
                    distance: record.distance,
                    rank: record.rank,
                    from_angle,
                    to_angle,
                    angle_diff: diff,
                });
            }
        }

        debug!(
            records = self.records.len(),
            separate,
            parallel = pairs.len(),
            tolerance = self.tolerance,
            "resolved angles"
        );
        Ok(pairs)
    }
}

fn angle_of(set: &SegmentSet, id: SegmentId, side: &str) -> Result<f64> {
    set.get(id).map(crate::geometry::Segment::angle).ok_or_else(|| {
        OperationError::Invariant(format!("near record names unknown segment {id} of set {side}"))
            .into()
    })
}
