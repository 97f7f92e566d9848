use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::angle_2d::segment_angle;
use crate::math::Point2;

/// Identifier of a segment within its [`SegmentSet`].
///
/// Ids are zero-based, dense, and assigned in emission order, so an id is
/// also the segment's index in its set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub usize);

impl SegmentId {
    /// Returns the id as an index into its set.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A straight piece of a polyline between two consecutive distinct vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    id: SegmentId,
    start: Point2,
    end: Point2,
    angle: f64,
    owner: usize,
    part: usize,
}

impl Segment {
    /// Creates a segment and computes its orientation angle.
    #[must_use]
    pub fn new(id: SegmentId, start: Point2, end: Point2, owner: usize, part: usize) -> Self {
        Self {
            id,
            start,
            end,
            angle: segment_angle(&start, &end),
            owner,
            part,
        }
    }

    #[must_use]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    /// Orientation in degrees, see [`segment_angle`].
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Index of the source polyline in the input dataset.
    #[must_use]
    pub fn owner(&self) -> usize {
        self.owner
    }

    /// Index of the part within the source polyline.
    #[must_use]
    pub fn part(&self) -> usize {
        self.part
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Checks that both endpoints are finite.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFiniteSegment` naming this segment and its
    /// source geometry and part.
    pub fn ensure_finite(&self) -> Result<()> {
        let finite = [self.start.x, self.start.y, self.end.x, self.end.y]
            .iter()
            .all(|c| c.is_finite());
        if finite {
            Ok(())
        } else {
            Err(GeometryError::NonFiniteSegment {
                segment: self.id.index(),
                geometry: self.owner,
                part: self.part,
            }
            .into())
        }
    }

    /// Axis-aligned bounds as `([min_x, min_y], [max_x, max_y])`.
    #[must_use]
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.start.x.min(self.end.x), self.start.y.min(self.end.y)],
            [self.start.x.max(self.end.x), self.start.y.max(self.end.y)],
        )
    }
}

/// An ordered segment collection with O(1) lookup by id.
#[derive(Debug, Clone, Default)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment between `start` and `end`, returning its id.
    pub fn push(&mut self, start: Point2, end: Point2, owner: usize, part: usize) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments.push(Segment::new(id, start, end, owner, part));
        id
    }

    #[must_use]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
