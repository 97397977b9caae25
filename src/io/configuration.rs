//! Engine constants and runtime configuration defaults

// Statistical thresholds
/// Two-tailed p-value at or below which a statistic is significant
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Lower bound for variances, denominators and deviations used as divisors
pub const NUMERICAL_FLOOR: f64 = 1e-10;

/// Tolerance for a standardized row summing to one
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Input and output settings
/// Extension of observation and flow files
pub const INPUT_EXTENSION: &str = "csv";
/// Suffix added to per-region result filenames
pub const OUTPUT_SUFFIX: &str = "_lisa";

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "warn";
