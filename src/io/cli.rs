//! Command-line interface for batch LISA runs over observation CSV files

use crate::analysis::engine::{EngineConfig, MoranEngine};
use crate::analysis::weights::{DuplicateEdgePolicy, SpatialWeights};
use crate::io::configuration::{INPUT_EXTENSION, OUTPUT_SUFFIX, SIGNIFICANCE_LEVEL};
use crate::io::error::{Result, WithPath, invalid_parameter};
use crate::io::input::{read_flows, read_observations};
use crate::io::progress::{FileStage, ProgressManager};
use crate::io::report::{summary_line, write_local_results_file};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Duplicate-edge handling as spelled on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DuplicateEdges {
    /// Keep the flow of the last edge naming a pair
    LastWins,
    /// Add the flows of every edge naming a pair
    Sum,
}

impl From<DuplicateEdges> for DuplicateEdgePolicy {
    fn from(value: DuplicateEdges) -> Self {
        match value {
            DuplicateEdges::LastWins => Self::LastWins,
            DuplicateEdges::Sum => Self::Sum,
        }
    }
}

#[derive(Parser)]
#[command(name = "market-lisa")]
#[command(
    author,
    version,
    about = "Global and local Moran's I for regional market data"
)]
/// Command-line arguments for the analysis tool
pub struct Cli {
    /// Flow edges CSV with columns source,target,average_flow
    #[arg(value_name = "FLOWS")]
    pub flows: PathBuf,

    /// Observation CSV with columns region,value, or a directory of them
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory for result files (defaults to next to each input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Significance level for p-values
    #[arg(short = 'a', long, default_value_t = SIGNIFICANCE_LEVEL)]
    pub alpha: f64,

    /// How repeated edges between the same two regions are combined
    #[arg(short, long, value_enum, default_value_t = DuplicateEdges::LastWins)]
    pub duplicate_edges: DuplicateEdges,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Engine configuration selected by the flags
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            significance_level: self.alpha,
            duplicate_edges: self.duplicate_edges.into(),
            ..EngineConfig::default()
        }
    }
}

/// Runs the engine over every observation file against one flow network
pub struct BatchProcessor {
    cli: Cli,
}

impl BatchProcessor {
    /// Create a new batch processor with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Process files according to CLI arguments, returning the result files written
    ///
    /// The weights matrix is built once and reused for every observation file.
    /// Global summaries are written to stdout after all files are done.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or if reading an
    /// input or writing a result fails
    pub fn process(&self) -> Result<Vec<PathBuf>> {
        let engine = MoranEngine::new(self.cli.engine_config())?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dir) = &self.cli.output_dir {
            std::fs::create_dir_all(dir).with_operation(dir, "create output directory")?;
        }

        let edges = read_flows(&self.cli.flows)?;
        let weights = engine.build_weights(&edges);
        info!(
            regions = weights.len(),
            edges = edges.len(),
            files = files.len(),
            "flow network loaded"
        );

        let progress = if self.cli.should_show_progress() {
            ProgressManager::new(files.len())
        } else {
            ProgressManager::hidden(files.len())
        };

        let mut written = Vec::with_capacity(files.len());
        let mut summaries = Vec::with_capacity(files.len());
        for file in &files {
            let (output, summary) = self.process_file(&engine, &weights, &progress, file)?;
            written.push(output);
            summaries.push(summary);
        }

        progress.finish();
        info!(files = progress.completed_files(), "batch finished");

        let stdout_path = Path::new("<stdout>");
        let mut stdout = std::io::stdout().lock();
        for summary in &summaries {
            writeln!(stdout, "{summary}").with_operation(stdout_path, "write summary")?;
        }

        Ok(written)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !has_input_extension(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"observation file must be a CSV",
                ));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).with_operation(target, "read directory")? {
                let path = entry.with_operation(target, "read directory")?.path();
                if has_input_extension(&path)
                    && !self.is_flows_file(&path)
                    && !is_result_file(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a CSV file or a directory",
            ))
        }
    }

    fn is_flows_file(&self, path: &Path) -> bool {
        match (path.canonicalize(), self.cli.flows.canonicalize()) {
            (Ok(candidate), Ok(flows)) => candidate == flows,
            _ => path == self.cli.flows,
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path(input_path);
        if output_path.exists() {
            info!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(
        &self,
        engine: &MoranEngine,
        weights: &SpatialWeights,
        progress: &ProgressManager,
        input_path: &Path,
    ) -> Result<(PathBuf, String)> {
        let start_time = Instant::now();
        let output_path = self.output_path(input_path);
        progress.start_file(input_path);

        let observations = read_observations(input_path)?;
        progress.complete_stage(FileStage::Read, observations.len());

        let analysis = engine.analyze_with_weights(&observations, weights);
        progress.complete_stage(FileStage::Analyze, analysis.local.len());

        write_local_results_file(&output_path, &analysis.local)?;
        progress.complete_stage(FileStage::Write, analysis.local.len());

        let label = input_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let summary = summary_line(&label, &analysis);
        let off_network = observations
            .iter()
            .filter(|obs| !weights.contains(obs.region.as_str()))
            .count();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            significant_regions = analysis.summary.significant(),
            off_network,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "analysis written"
        );

        Ok((output_path, summary))
    }

    fn output_path(&self, input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            INPUT_EXTENSION
        );

        match (&self.cli.output_dir, input_path.parent()) {
            (Some(dir), _) => dir.join(output_name),
            (None, Some(parent)) => parent.join(output_name),
            (None, None) => PathBuf::from(output_name),
        }
    }
}

fn has_input_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(INPUT_EXTENSION)
}

fn is_result_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}
