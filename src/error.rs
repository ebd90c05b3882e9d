//! Centralized error types for the logging facade
//!
//! All facade errors are represented by the `Error` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, Error>`.

use std::fmt;
use std::path::PathBuf;

/// All facade errors
#[derive(Debug)]
pub enum Error {
    // === Configuration ===
    /// Severity value outside the recognized range
    InvalidLevel { value: String },
    /// Configuration file could not be parsed
    ConfigParse { path: PathBuf, reason: String },

    // === Filesystem ===
    /// Failed to create the log directory
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to open the log file for append
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Runtime ===
    /// Failed to spawn the lifecycle monitor thread
    MonitorSpawn { source: std::io::Error },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. }
            | Self::FileOpen { source, .. }
            | Self::MonitorSpawn { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { value } => write!(f, "Invalid log level: {}", value),
            Self::ConfigParse { path, reason } => {
                write!(f, "Invalid config {}: {}", path.display(), reason)
            }
            Self::CreateDirectory { path, .. } => {
                write!(f, "Cannot create log directory: {}", path.display())
            }
            Self::FileOpen { path, .. } => {
                write!(f, "Cannot open log file: {}", path.display())
            }
            Self::MonitorSpawn { .. } => write!(f, "Failed to spawn lifecycle monitor"),
        }
    }
}

/// Alias for Result with the facade Error
pub type Result<T> = std::result::Result<T, Error>;
