//! CSV input adapter producing observations and flow edges
//!
//! Observation files carry `region,value`; flow files carry
//! `source,target,average_flow` (`averageFlow` is accepted as well). Missing
//! values and unusable flows are dropped here so the engine only ever sees
//! complete data.

use crate::io::error::{Result, WithPath, malformed_record};
use crate::spatial::region::{FlowEdge, Observation, RegionId};
use csv::{Position, StringRecord};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ObservationRecord {
    region: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FlowRecord {
    source: String,
    target: String,
    #[serde(alias = "averageFlow")]
    average_flow: f64,
}

/// Read observations from a CSV file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row is malformed
pub fn read_observations(path: &Path) -> Result<Vec<Observation>> {
    let file = File::open(path).with_operation(path, "open observations")?;
    observations_from_reader(file, path)
}

/// Read flow edges from a CSV file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row is malformed
pub fn read_flows(path: &Path) -> Result<Vec<FlowEdge>> {
    let file = File::open(path).with_operation(path, "open flows")?;
    flows_from_reader(file, path)
}

/// Parse observations from any reader; `origin` is only used in messages
///
/// Rows with an empty or non-finite value are skipped as missing data.
///
/// # Errors
///
/// Returns an error if a row cannot be parsed, names no region, or repeats
/// a region already seen
pub fn observations_from_reader<R: std::io::Read>(
    reader: R,
    origin: &Path,
) -> Result<Vec<Observation>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers().with_path(origin)?.clone();
    let mut row = StringRecord::new();
    let mut observations = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = 0_usize;

    while csv_reader.read_record(&mut row).with_path(origin)? {
        let line = row.position().map_or(0, Position::line);
        let record: ObservationRecord = row
            .deserialize(Some(&headers))
            .map_err(|e| malformed_record(origin, line, &e))?;

        if record.region.is_empty() {
            return Err(malformed_record(origin, line, &"empty region"));
        }
        let Some(value) = record.value.filter(|v| v.is_finite()) else {
            skipped += 1;
            continue;
        };
        let region = RegionId::new(record.region);
        if !seen.insert(region.clone()) {
            return Err(malformed_record(
                origin,
                line,
                &format!("region '{region}' appears more than once"),
            ));
        }
        observations.push(Observation { region, value });
    }

    debug!(
        path = %origin.display(),
        observations = observations.len(),
        skipped,
        "read observations"
    );
    Ok(observations)
}

/// Parse flow edges from any reader; `origin` is only used in messages
///
/// Edges with a negative or non-finite flow are dropped with a warning.
///
/// # Errors
///
/// Returns an error if a row cannot be parsed or names an empty region
pub fn flows_from_reader<R: std::io::Read>(reader: R, origin: &Path) -> Result<Vec<FlowEdge>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers().with_path(origin)?.clone();
    let mut row = StringRecord::new();
    let mut edges = Vec::new();

    while csv_reader.read_record(&mut row).with_path(origin)? {
        let line = row.position().map_or(0, Position::line);
        let record: FlowRecord = row
            .deserialize(Some(&headers))
            .map_err(|e| malformed_record(origin, line, &e))?;

        if record.source.is_empty() || record.target.is_empty() {
            return Err(malformed_record(origin, line, &"empty source or target"));
        }
        if !record.average_flow.is_finite() || record.average_flow < 0.0 {
            warn!(
                path = %origin.display(),
                line,
                flow = record.average_flow,
                "dropping flow edge with unusable flow"
            );
            continue;
        }
        edges.push(FlowEdge::new(
            record.source,
            record.target,
            record.average_flow,
        ));
    }

    debug!(path = %origin.display(), edges = edges.len(), "read flow edges");
    Ok(edges)
}

fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}
