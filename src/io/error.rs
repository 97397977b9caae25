//! Error types for configuration and input handling
//!
//! The statistics themselves never fail; errors only arise at the boundary
//! where configuration is validated and CSV inputs are read or written.

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all fallible operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Engine or CLI parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A CSV row could be read but not interpreted
    MalformedRecord {
        /// File containing the row
        path: PathBuf,
        /// One-based line number of the row
        line: u64,
        /// Description of the problem
        reason: String,
    },

    /// CSV reading or writing failed
    Csv {
        /// File being read or written
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MalformedRecord { path, line, reason } => {
                write!(
                    f,
                    "Malformed record in '{}' at line {line}: {reason}",
                    path.display()
                )
            }
            Self::Csv { path, source } => {
                write!(f, "CSV error in '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::InvalidParameter { .. } | Self::MalformedRecord { .. } => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Attaches the file being processed to errors raised without one
pub trait WithPath<T> {
    /// Replace an unknown path on the error with `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path) -> Result<T>;

    /// Attach both the path and the operation being performed
    ///
    /// # Errors
    ///
    /// Propagates the original error with path and operation applied
    fn with_operation(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                AnalysisError::Csv { path: slot, .. }
                | AnalysisError::FileSystem { path: slot, .. }
                | AnalysisError::MalformedRecord { path: slot, .. } => {
                    *slot = path.to_path_buf();
                }
                AnalysisError::InvalidParameter { .. } => {}
            }
            error
        })
    }

    fn with_operation(self, path: &Path, operation: &'static str) -> Result<T> {
        self.with_path(path).map_err(|mut error| {
            if let AnalysisError::FileSystem { operation: slot, .. } = &mut error {
                *slot = operation;
            }
            error
        })
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed record error
pub fn malformed_record(path: &Path, line: u64, reason: &impl ToString) -> AnalysisError {
    AnalysisError::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    }
}
