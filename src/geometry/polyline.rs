use crate::error::{GeometryError, Result};
use crate::math::Point2;

/// A possibly multi-part polyline.
///
/// Each part is an ordered vertex list walked independently; consecutive
/// parts are not connected to each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    parts: Vec<Vec<Point2>>,
}

impl Polyline {
    /// Creates a single-part polyline.
    #[must_use]
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self {
            parts: vec![points],
        }
    }

    /// Creates a polyline from several disjoint parts.
    #[must_use]
    pub fn from_parts(parts: Vec<Vec<Point2>>) -> Self {
        Self { parts }
    }

    /// Creates a single-part polyline from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::from_points(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Returns the parts of this polyline.
    #[must_use]
    pub fn parts(&self) -> &[Vec<Point2>] {
        &self.parts
    }

    /// Total number of vertices over all parts.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    /// Checks that every coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` naming `geometry` (the caller's index
    /// for this polyline) together with the part and vertex of the first
    /// offending coordinate.
    pub fn ensure_finite(&self, geometry: usize) -> Result<()> {
        for (part, points) in self.parts.iter().enumerate() {
            if let Some(vertex) = points
                .iter()
                .position(|p| !p.x.is_finite() || !p.y.is_finite())
            {
                return Err(GeometryError::NonFinite {
                    geometry,
                    part,
                    vertex,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// The ordered input geometry of one matching run.
///
/// `spatial_reference` is opaque to the matcher and handed back unchanged
/// with the outcome.
#[derive(Debug, Clone, Default)]
pub struct LineDataset {
    pub polylines: Vec<Polyline>,
    pub spatial_reference: Option<String>,
}

impl LineDataset {
    /// Creates a dataset without a spatial reference.
    #[must_use]
    pub fn new(polylines: Vec<Polyline>) -> Self {
        Self {
            polylines,
            spatial_reference: None,
        }
    }

    /// Attaches an opaque spatial reference.
    #[must_use]
    pub fn with_spatial_reference(mut self, spatial_reference: impl Into<String>) -> Self {
        self.spatial_reference = Some(spatial_reference.into());
        self
    }
}
