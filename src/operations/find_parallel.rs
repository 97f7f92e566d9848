use std::collections::BTreeSet;

use tracing::{info, warn};

use super::complete_pairs::{nearest_per_segment, CompletePairs, ResultRecord};
use super::near::{FindNear, ProximityRecord};
use super::resolve_angles::{PairRecord, ResolveAngles};
use super::segmentize::{FeatureSubset, Segmentize};
use crate::cancel::CancelToken;
use crate::config::{MatchParams, PairSelection, SetAssignment};
use crate::error::{ParlinesError, Result};
use crate::geometry::{LineDataset, SegmentId, SegmentSet};

/// Everything a matching run hands to its consumers.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The dataset's spatial reference, unchanged.
    pub spatial_reference: Option<String>,
    pub segments_a: SegmentSet,
    pub segments_b: SegmentSet,
    /// Every near pair, touching ones included.
    pub near_table: Vec<ProximityRecord>,
    /// The parallel pairs that made it into the result table.
    pub pairs: Vec<PairRecord>,
    pub results: Vec<ResultRecord>,
}

impl MatchOutcome {
    /// Sorted, distinct ids of set A segments that have a parallel partner.
    #[must_use]
    pub fn parallel_ids_a(&self) -> Vec<SegmentId> {
        let ids: BTreeSet<_> = self.pairs.iter().map(|p| p.from).collect();
        ids.into_iter().collect()
    }

    /// Sorted, distinct ids of set B segments that have a parallel partner.
    #[must_use]
    pub fn parallel_ids_b(&self) -> Vec<SegmentId> {
        let ids: BTreeSet<_> = self.pairs.iter().map(|p| p.to).collect();
        ids.into_iter().collect()
    }
}

/// Finds near-parallel segment pairs in a set of polylines.
///
/// # Algorithm
///
/// 1. Segment the input twice into sets A and B (see [`SetAssignment`])
/// 2. Build the near table of A against B within the search distance
/// 3. Drop touching pairs, attach angles, keep the parallel pairs
/// 4. Optionally reduce to the nearest parallel pair per A segment
/// 5. Add a `-1` row for every unmatched segment of either set
///
/// Parameters are validated before any stage runs. A cancelled run returns
/// `ParlinesError::Cancelled` and no outcome.
#[derive(Debug)]
pub struct FindParallelSegments {
    dataset: LineDataset,
    params: MatchParams,
    cancel: CancelToken,
}

impl FindParallelSegments {
    #[must_use]
    pub fn new(dataset: LineDataset, params: MatchParams) -> Self {
        Self {
            dataset,
            params,
            cancel: CancelToken::default(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes the matching run.
    ///
    /// # Errors
    ///
    /// - `ConfigError::OutOfRange` for invalid parameters
    /// - `GeometryError::NonFinite` for NaN or infinite input coordinates
    /// - `OperationError::Invariant` if a stage produced inconsistent records
    /// - `ParlinesError::Cancelled` if the run is cancelled
    pub fn execute(self) -> Result<MatchOutcome> {
        self.params.validate()?;
        info!(
            features = self.dataset.polylines.len(),
            search_distance = self.params.search_distance,
            angle_tolerance = self.params.angle_tolerance,
            "finding parallel segments"
        );

        let outcome = self.run();
        if let Err(ParlinesError::Cancelled { stage }) = &outcome {
            warn!(stage, "matching run cancelled");
        }
        outcome
    }

    fn run(self) -> Result<MatchOutcome> {
        let (subset_a, subset_b) = match self.params.assignment {
            SetAssignment::Duplicate => (FeatureSubset::All, FeatureSubset::All),
            SetAssignment::AlternateFeatures => (FeatureSubset::Even, FeatureSubset::Odd),
        };
        let polylines = &self.dataset.polylines;

        let segments_a = Segmentize::new(polylines)
            .with_subset(subset_a)
            .with_cancel(self.cancel.clone())
            .execute()?;
        let segments_b = Segmentize::new(polylines)
            .with_subset(subset_b)
            .with_cancel(self.cancel.clone())
            .execute()?;

        let near_table = FindNear::new(&segments_a, &segments_b, self.params.search_distance)
            .with_cancel(self.cancel.clone())
            .execute()?;

        let mut pairs = ResolveAngles::new(
            &near_table,
            &segments_a,
            &segments_b,
            self.params.angle_tolerance,
        )
        .with_cancel(self.cancel.clone())
        .execute()?;
        if self.params.selection == PairSelection::NearestPerSegment {
            pairs = nearest_per_segment(&pairs);
        }

        let results = CompletePairs::new(&pairs, &segments_a, &segments_b)
            .with_cancel(self.cancel.clone())
            .execute()?;

        info!(
            segments_a = segments_a.len(),
            segments_b = segments_b.len(),
            near = near_table.len(),
            parallel = pairs.len(),
            rows = results.len(),
            "matching finished"
        );

        Ok(MatchOutcome {
            spatial_reference: self.dataset.spatial_reference,
            segments_a,
            segments_b,
            near_table,
            pairs,
            results,
        })
    }
}
