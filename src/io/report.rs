//! Result export: per-region CSV and one-line global summaries

use crate::analysis::engine::SpatialAnalysis;
use crate::analysis::local::{ClusterType, LocalMoranResult};
use crate::io::error::{Result, WithPath};
use crate::spatial::region::RegionId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
struct LocalRecord<'a> {
    region: &'a str,
    local_i: f64,
    z_score: f64,
    p_value: f64,
    variance: f64,
    spatial_lag: f64,
    cluster_type: &'static str,
}

/// Write one CSV row per region to any writer
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails
pub fn write_local_results<W: std::io::Write>(
    writer: W,
    local: &BTreeMap<RegionId, LocalMoranResult>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (region, result) in local {
        csv_writer.serialize(LocalRecord {
            region: region.as_str(),
            local_i: result.local_i,
            z_score: result.z_score,
            p_value: result.p_value,
            variance: result.variance,
            spatial_lag: result.spatial_lag,
            cluster_type: result.cluster_type.code(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the per-region CSV to `path`
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_local_results_file(
    path: &Path,
    local: &BTreeMap<RegionId, LocalMoranResult>,
) -> Result<()> {
    let file = File::create(path).with_operation(path, "create results")?;
    write_local_results(file, local).with_path(path)
}

/// One line describing the global statistic and cluster counts
pub fn summary_line(label: &str, analysis: &SpatialAnalysis) -> String {
    let global = &analysis.global;
    let verdict = if global.significant {
        "significant"
    } else {
        "not significant"
    };
    let clusters = ClusterType::ALL
        .iter()
        .map(|&cluster_type| {
            format!(
                "{}={}",
                cluster_type.code(),
                analysis.summary.count(cluster_type)
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{label}: I={:.4} E[I]={:.4} z={:.3} p={:.4} ({verdict}); {clusters}",
        global.moran_i, global.expected_i, global.z_score, global.p_value
    )
}
