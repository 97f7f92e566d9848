//! Matching parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How the input features are distributed over the two segment sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetAssignment {
    /// Both sets are segmented from the whole input.
    #[default]
    Duplicate,
    /// Even-indexed features go to set A, odd-indexed features to set B.
    AlternateFeatures,
}

/// Which parallel pairs make it into the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairSelection {
    /// Every parallel pair.
    #[default]
    All,
    /// Only the nearest parallel pair of each segment in set A.
    NearestPerSegment,
}

/// Parameters of one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// Search radius, in the linear unit of the input coordinates.
    /// Default: 5.0
    pub search_distance: f64,

    /// Angle tolerance in degrees, `0 <= tolerance < 180`.
    /// Default: 10.0
    pub angle_tolerance: f64,

    /// Default: [`SetAssignment::Duplicate`]
    pub assignment: SetAssignment,

    /// Default: [`PairSelection::All`]
    pub selection: PairSelection,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            search_distance: 5.0,
            angle_tolerance: 10.0,
            assignment: SetAssignment::default(),
            selection: PairSelection::default(),
        }
    }
}

impl MatchParams {
    /// Creates parameters with the given distance and tolerance and default
    /// assignment and selection.
    #[must_use]
    pub fn new(search_distance: f64, angle_tolerance: f64) -> Self {
        Self {
            search_distance,
            angle_tolerance,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_assignment(mut self, assignment: SetAssignment) -> Self {
        self.assignment = assignment;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: PairSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Parses parameters from JSON and validates them. Missing fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` if the JSON does not parse, or
    /// `ConfigError::OutOfRange` if a value fails [`MatchParams::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks the parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` if `search_distance` is negative or
    /// not finite, or if `angle_tolerance` is outside `[0, 180)`.
    pub fn validate(&self) -> Result<()> {
        validate_search_distance(self.search_distance)?;
        validate_angle_tolerance(self.angle_tolerance)
    }
}

pub(crate) fn validate_search_distance(value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            parameter: "search_distance",
            value,
            range: "[0, inf)",
        }
        .into())
    }
}

pub(crate) fn validate_angle_tolerance(value: f64) -> Result<()> {
    if (0.0..180.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            parameter: "angle_tolerance",
            value,
            range: "[0, 180)",
        }
        .into())
    }
}
