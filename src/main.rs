//! CLI entry point for batch spatial autocorrelation analysis

use clap::Parser;
use market_lisa::io::cli::{BatchProcessor, Cli};
use market_lisa::io::logging::init_logging;

fn main() -> market_lisa::Result<()> {
    let cli = Cli::parse();
    init_logging();
    BatchProcessor::new(cli).process().map(|_| ())
}
