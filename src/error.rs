use thiserror::Error;

/// Top-level error type for the parlines matcher.
#[derive(Debug, Error)]
pub enum ParlinesError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("run cancelled during {stage}")]
    Cancelled { stage: &'static str },
}

/// Invalid matching parameters, reported before any stage runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter {parameter} = {value} is out of range {range}")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("malformed parameters: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors related to input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate in geometry {geometry}, part {part}, vertex {vertex}")]
    NonFinite {
        geometry: usize,
        part: usize,
        vertex: usize,
    },

    #[error("non-finite coordinate in segment {segment} of geometry {geometry}, part {part}")]
    NonFiniteSegment {
        segment: usize,
        geometry: usize,
        part: usize,
    },
}

/// Errors raised while running a matching stage.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Errors raised by exporters.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("export serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`ParlinesError`].
pub type Result<T> = std::result::Result<T, ParlinesError>;
