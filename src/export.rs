//! Sinks for matching outcomes.
//!
//! An exporter receives the two segment tables and the result table of a
//! finished run. Formats beyond JSON lines belong to the caller.

use std::io::Write;

use serde::Serialize;

use crate::error::{ExportError, Result};
use crate::geometry::{Segment, SegmentSet};
use crate::operations::MatchOutcome;

/// Consumer of a finished matching run.
pub trait Exporter {
    /// Consumes the outcome.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if the sink cannot store the tables.
    fn export(&mut self, outcome: &MatchOutcome) -> Result<()>;
}

/// Flat row of a segment table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub id: usize,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub angle: f64,
    pub owner: usize,
    pub part: usize,
}

impl From<&Segment> for SegmentRow {
    fn from(s: &Segment) -> Self {
        Self {
            id: s.id().index(),
            start_x: s.start().x,
            start_y: s.start().y,
            end_x: s.end().x,
            end_y: s.end().y,
            angle: s.angle(),
            owner: s.owner(),
            part: s.part(),
        }
    }
}

/// Flat row of the result table; `-1` marks a missing partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub segment_a: i64,
    pub segment_b: i64,
}

fn segment_rows(set: &SegmentSet) -> Vec<SegmentRow> {
    set.iter().map(SegmentRow::from).collect()
}

fn result_rows(outcome: &MatchOutcome) -> Vec<ResultRow> {
    outcome
        .results
        .iter()
        .map(|r| {
            let (segment_a, segment_b) = r.as_row();
            ResultRow {
                segment_a,
                segment_b,
            }
        })
        .collect()
}

/// Keeps the exported tables in memory.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    pub spatial_reference: Option<String>,
    pub segments_a: Vec<SegmentRow>,
    pub segments_b: Vec<SegmentRow>,
    pub results: Vec<ResultRow>,
}

impl Exporter for MemoryExporter {
    fn export(&mut self, outcome: &MatchOutcome) -> Result<()> {
        self.spatial_reference.clone_from(&outcome.spatial_reference);
        self.segments_a = segment_rows(&outcome.segments_a);
        self.segments_b = segment_rows(&outcome.segments_b);
        self.results = result_rows(outcome);
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "table", rename_all = "snake_case")]
enum Line<'a> {
    Header { spatial_reference: Option<&'a str> },
    SegmentsA(&'a SegmentRow),
    SegmentsB(&'a SegmentRow),
    Result(&'a ResultRow),
}

/// Writes one JSON object per line: a header, then segments of set A,
/// segments of set B, and the result rows, each tagged with its table name.
#[derive(Debug)]
pub struct JsonLinesExporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesExporter<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &Line<'_>) -> std::result::Result<(), ExportError> {
        serde_json::to_writer(&mut self.writer, line)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Exporter for JsonLinesExporter<W> {
    fn export(&mut self, outcome: &MatchOutcome) -> Result<()> {
        let segments_a = segment_rows(&outcome.segments_a);
        let segments_b = segment_rows(&outcome.segments_b);
        let results = result_rows(outcome);

        self.write_line(&Line::Header {
            spatial_reference: outcome.spatial_reference.as_deref(),
        })?;
        for row in &segments_a {
            self.write_line(&Line::SegmentsA(row))?;
        }
        for row in &segments_b {
            self.write_line(&Line::SegmentsB(row))?;
        }
        for row in &results {
            self.write_line(&Line::Result(row))?;
        }
        self.writer.flush().map_err(ExportError::from)?;
        Ok(())
    }
}
