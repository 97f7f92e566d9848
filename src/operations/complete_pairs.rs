use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::resolve_angles::PairRecord;
use crate::cancel::CancelToken;
use crate::error::{OperationError, Result};
use crate::geometry::{SegmentId, SegmentSet};

const STAGE: &str = "complete_pairs";

/// Column value written for a missing partner.
pub const UNMATCHED: i64 = -1;

/// One row of the result table.
///
/// A parallel pair fills both columns. An unmatched segment of set A has
/// `segment_b = None`, an unmatched segment of set B has `segment_a = None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResultRecord {
    pub segment_a: Option<SegmentId>,
    pub segment_b: Option<SegmentId>,
}

impl ResultRecord {
    #[must_use]
    pub fn matched(a: SegmentId, b: SegmentId) -> Self {
        Self {
            segment_a: Some(a),
            segment_b: Some(b),
        }
    }

    #[must_use]
    pub fn unmatched_a(a: SegmentId) -> Self {
        Self {
            segment_a: Some(a),
            segment_b: None,
        }
    }

    #[must_use]
    pub fn unmatched_b(b: SegmentId) -> Self {
        Self {
            segment_a: None,
            segment_b: Some(b),
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.segment_a.is_some() && self.segment_b.is_some()
    }

    /// Both columns as integers, with [`UNMATCHED`] for a missing partner.
    #[must_use]
    pub fn as_row(&self) -> (i64, i64) {
        (to_column(self.segment_a), to_column(self.segment_b))
    }
}

#[allow(clippy::cast_possible_wrap)]
fn to_column(id: Option<SegmentId>) -> i64 {
    // Ids are vector indices and therefore fit in an i64.
    id.map_or(UNMATCHED, |id| id.index() as i64)
}

/// Keeps only the lowest-rank parallel pair of each `from` segment.
///
/// Input order is preserved for the kept pairs.
#[must_use]
pub fn nearest_per_segment(pairs: &[PairRecord]) -> Vec<PairRecord> {
    let mut best: Vec<PairRecord> = Vec::new();
    let mut slot_of: HashMap<SegmentId, usize> = HashMap::new();
    for pair in pairs {
        match slot_of.get(&pair.from) {
            Some(&slot) => {
                if pair.rank < best[slot].rank {
                    best[slot] = *pair;
                }
            }
            None => {
                slot_of.insert(pair.from, best.len());
                best.push(*pair);
            }
        }
    }
    best
}

/// Builds the result table: one row per parallel pair, then one row per
/// unmatched segment of set A, then one per unmatched segment of set B.
///
/// Matched flags are indexed by segment id, so each unmatched check is O(1).
#[derive(Debug)]
pub struct CompletePairs<'a> {
    pairs: &'a [PairRecord],
    set_a: &'a SegmentSet,
    set_b: &'a SegmentSet,
    cancel: CancelToken,
}

impl<'a> CompletePairs<'a> {
    #[must_use]
    pub fn new(pairs: &'a [PairRecord], set_a: &'a SegmentSet, set_b: &'a SegmentSet) -> Self {
        Self {
            pairs,
            set_a,
            set_b,
            cancel: CancelToken::default(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes the completion.
    ///
    /// # Errors
    ///
    /// - `OperationError::Invariant` if a pair names a segment missing from
    ///   its set, or if the same pair appears twice
    /// - `ParlinesError::Cancelled` if the run is cancelled
    pub fn execute(&self) -> Result<Vec<ResultRecord>> {
        let mut matched_a = vec![false; self.set_a.len()];
        let mut matched_b = vec![false; self.set_b.len()];
        let mut seen = HashSet::with_capacity(self.pairs.len());
        let mut results = Vec::with_capacity(self.pairs.len());

        for pair in self.pairs {
            self.cancel.check(STAGE)?;
            mark(&mut matched_a, pair.from, "A")?;
            mark(&mut matched_b, pair.to, "B")?;
            if !seen.insert((pair.from, pair.to)) {
                return Err(OperationError::Invariant(format!(
                    "pair ({}, {}) listed twice",
                    pair.from, pair.to
                ))
                .into());
            }
            results.push(ResultRecord::matched(pair.from, pair.to));
        }

        let parallel = results.len();
        for segment in self.set_a {
            self.cancel.check(STAGE)?;
            if !matched_a[segment.id().index()] {
                results.push(ResultRecord::unmatched_a(segment.id()));
            }
        }
        let unmatched_a = results.len() - parallel;
        for segment in self.set_b {
            self.cancel.check(STAGE)?;
            if !matched_b[segment.id().index()] {
                results.push(ResultRecord::unmatched_b(segment.id()));
            }
        }

        debug!(
            parallel,
            unmatched_a,
            unmatched_b = results.len() - parallel - unmatched_a,
            "completed pairs"
        );
        Ok(results)
    }
}

fn mark(flags: &mut [bool], id: SegmentId, side: &str) -> Result<()> {
    let flag = flags.get_mut(id.index()).ok_or_else(|| {
        OperationError::Invariant(format!("pair names unknown segment {id} of set {side}"))
    })?;
    *flag = true;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ParlinesError;
    use crate::math::Point2;

    fn set_with(n: usize) -> SegmentSet {
        let mut set = SegmentSet::new();
        for i in 0..n {
            let y = f64::from(u32::try_from(i).unwrap());
            set.push(Point2::new(0.0, y), Point2::new(1.0, y), i, 0);
        }
        set
    }

    fn pair(from: usize, to: usize, rank: u32) -> PairRecord {
        PairRecord {
            from: SegmentId(from),
            to: SegmentId(to),
            distance: 1.0,
            rank,
            from_angle: 0.0,
            to_angle: 0.0,
            angle_diff: 0.0,
        }
    }

    #[test]
    fn every_segment_appears() {
        let a = set_with(4);
        let b = set_with(3);
        let pairs = [pair(0, 1, 1), pair(0, 2, 2), pair(3, 1, 1)];
        let results = CompletePairs::new(&pairs, &a, &b).execute().unwrap();

        let rows: Vec<_> = results.iter().map(ResultRecord::as_row).collect();
        assert_eq!(
            rows,
            vec![(0, 1), (0, 2), (3, 1), (1, -1), (2, -1), (-1, 0)]
        );

        let ids_a: HashSet<_> = results.iter().filter_map(|r| r.segment_a).collect();
        let ids_b: HashSet<_> = results.iter().filter_map(|r| r.segment_b).collect();
        assert_eq!(ids_a.len(), a.len());
        assert_eq!(ids_b.len(), b.len());
    }

    #[test]
    fn matched_ids_never_get_unmatched_rows() {
        let a = set_with(3);
        let b = set_with(3);
        let pairs = [pair(1, 1, 1), pair(2, 0, 1)];
        let results = CompletePairs::new(&pairs, &a, &b).execute().unwrap();
        for r in results.iter().filter(|r| !r.is_matched()) {
            if let Some(id) = r.segment_a {
                assert!(!pairs.iter().any(|p| p.from == id));
            }
            if let Some(id) = r.segment_b {
                assert!(!pairs.iter().any(|p| p.to == id));
            }
        }
        let unmatched_a = 1;
        let unmatched_b = 1;
        assert_eq!(results.len(), pairs.len() + unmatched_a + unmatched_b);
    }

    #[test]
    fn no_pairs_all_unmatched() {
        let a = set_with(2);
        let b = set_with(2);
        let results = CompletePairs::new(&[], &a, &b).execute().unwrap();
        let rows: Vec<_> = results.iter().map(ResultRecord::as_row).collect();
        assert_eq!(rows, vec![(0, -1), (1, -1), (-1, 0), (-1, 1)]);
    }

    #[test]
    fn empty_sets_empty_table() {
        let empty = SegmentSet::new();
        assert!(CompletePairs::new(&[], &empty, &empty).execute().unwrap().is_empty());
    }

    #[test]
    fn unknown_id_is_an_invariant_error() {
        let a = set_with(1);
        let b = set_with(1);
        let err = CompletePairs::new(&[pair(0, 5, 1)], &a, &b).execute().unwrap_err();
        assert!(matches!(err, ParlinesError::Operation(OperationError::Invariant(_))));
    }

    #[test]
    fn duplicate_pair_is_an_invariant_error() {
        let a = set_with(1);
        let b = set_with(1);
        let err = CompletePairs::new(&[pair(0, 0, 1), pair(0, 0, 1)], &a, &b)
            .execute()
            .unwrap_err();
        assert!(matches!(err, ParlinesError::Operation(OperationError::Invariant(_))));
    }

    #[test]
    fn nearest_keeps_lowest_rank() {
        let pairs = [pair(0, 4, 3), pair(1, 2, 2), pair(0, 1, 1), pair(1, 3, 5)];
        let best = nearest_per_segment(&pairs);
        let kept: Vec<_> = best.iter().map(|p| (p.from.index(), p.to.index())).collect();
        assert_eq!(kept, vec![(0, 1), (1, 2)]);
    }
}
