//! Runs the matcher on a small street-like dataset and prints the tables as
//! JSON lines.
//!
//! Usage:
//! ```text
//! cargo run --example near_parallel                          # defaults
//! cargo run --example near_parallel -- '{"search_distance": 4.0}'
//! ```

use parlines::export::{Exporter, JsonLinesExporter};
use parlines::{FindParallelSegments, LineDataset, MatchParams, ParlinesError, Polyline};

fn dataset() -> LineDataset {
    LineDataset::new(vec![
        // Two carriageways of the same road.
        Polyline::from_xy(&[(0.0, 0.0), (40.0, 0.5), (80.0, 3.0), (120.0, 3.0)]),
        Polyline::from_xy(&[(0.0, 3.5), (40.0, 4.0), (80.0, 6.4), (80.0, 6.4), (120.0, 6.6)]),
        // A crossing street.
        Polyline::from_xy(&[(60.0, -20.0), (60.0, 30.0)]),
        // A lone footpath.
        Polyline::from_parts(vec![vec![
            parlines::math::Point2::new(200.0, 0.0),
            parlines::math::Point2::new(210.0, 10.0),
        ]]),
    ])
    .with_spatial_reference("EPSG:25832")
}

fn main() -> Result<(), ParlinesError> {
    // Default: WARN for everything, INFO for parlines.
    // Override with RUST_LOG env var (e.g. RUST_LOG=parlines=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("parlines=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let params = match std::env::args().nth(1) {
        Some(json) => MatchParams::from_json_str(&json)?,
        None => MatchParams::default(),
    };

    let outcome = FindParallelSegments::new(dataset(), params).execute()?;

    let stdout = std::io::stdout();
    let mut exporter = JsonLinesExporter::new(stdout.lock());
    exporter.export(&outcome)
}
