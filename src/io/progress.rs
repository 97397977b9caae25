//! Batch progress over observation files, advanced one processing stage at a time

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Steps every observation file goes through, in processing order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileStage {
    /// Observations parsed from disk
    Read,
    /// Global and local statistics computed
    Analyze,
    /// Per-region results written
    Write,
}

impl FileStage {
    /// Stages in processing order
    pub const ALL: [Self; 3] = [Self::Read, Self::Analyze, Self::Write];

    /// Past-tense label shown once the stage is done
    pub const fn label(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Analyze => "analysed",
            Self::Write => "written",
        }
    }
}

const STAGES_PER_FILE: u64 = FileStage::ALL.len() as u64;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{prefix}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// One bar spanning every stage of every file in a batch
///
/// The bar length is `files * 3`, so a file moves the bar three times: after
/// it is read, after it is analysed and after its results are written.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Progress drawn to stderr for `file_count` files
    pub fn new(file_count: usize) -> Self {
        Self::with_target(file_count, ProgressDrawTarget::stderr())
    }

    /// Progress that keeps count without drawing anything
    pub fn hidden(file_count: usize) -> Self {
        Self::with_target(file_count, ProgressDrawTarget::hidden())
    }

    fn with_target(file_count: usize, target: ProgressDrawTarget) -> Self {
        let length = (file_count as u64).saturating_mul(STAGES_PER_FILE);
        let bar = ProgressBar::with_draw_target(Some(length), target);
        bar.set_style(BATCH_STYLE.clone());
        Self { bar }
    }

    /// Name the file whose stages follow
    pub fn start_file(&self, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.bar.set_prefix(display_name);
        self.bar.set_message(String::new());
    }

    /// Advance past a finished stage, returning the stages completed so far
    pub fn complete_stage(&self, stage: FileStage, regions: usize) -> u64 {
        self.bar.inc(1);
        self.bar.set_message(format!("{regions} regions {}", stage.label()));
        self.bar.position()
    }

    /// Files whose every stage has finished
    pub fn completed_files(&self) -> u64 {
        self.bar.position() / STAGES_PER_FILE
    }

    /// Leave the bar at its final position
    pub fn finish(&self) {
        self.bar.finish_with_message(format!("{} files processed", self.completed_files()));
    }
}
