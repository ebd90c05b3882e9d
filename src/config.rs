//! Configuration management
//!
//! Recognized initialization options for the facade, loadable from a TOML
//! file. Missing fields fall back to defaults; an unreadable file falls back
//! to the full default configuration with a diagnostic warning.

use crate::constants::{
    DEFAULT_FILE_PREFIX, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MONITOR_TICK_MS,
    DEFAULT_ROLLOVER_CHECK_SECS, LOG_DIR_NAME,
};
use crate::error::{Error, Result};
use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

// =============================================================================
// Output format
// =============================================================================

/// Encoding of emitted records
///
/// The wire format itself is the formatter's concern; the facade only
/// carries the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One JSON object per line
    Json,
    /// Human-readable text with a fixed timestamp layout
    #[default]
    Text,
}

// =============================================================================
// Facade configuration
// =============================================================================

/// Initialization options for [`crate::Logger`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum severity that is emitted
    pub level: Level,

    /// Output format for both file and console
    pub format: Format,

    /// Log filename prefix (empty = default prefix)
    pub file_prefix: String,

    /// Append `_YYYYMMDD` to the filename
    pub date_suffix: bool,

    /// Mirror every emission to stdout
    pub console: bool,

    /// Close the backing file after this many seconds without an emission.
    /// Zero or negative means "close on the fastest polling interval".
    pub idle_timeout_secs: i64,

    /// Explicit base directory (the `log/` directory is created beneath it).
    /// None = resolve next to the running executable.
    pub base_dir: Option<PathBuf>,

    /// Tick of the idle-close check (milliseconds)
    pub monitor_tick_ms: u64,

    /// Cadence of the daily-rollover check (seconds)
    pub rollover_check_secs: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: Format::Text,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            date_suffix: true,
            console: true,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            base_dir: None,
            monitor_tick_ms: DEFAULT_MONITOR_TICK_MS,
            rollover_check_secs: DEFAULT_ROLLOVER_CHECK_SECS,
        }
    }
}

impl LoggerConfig {
    /// Parse a configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` when the content is not valid TOML for
    /// this structure.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load a configuration file, or fall back to defaults.
    ///
    /// A missing, unreadable or unparsable file is reported on the
    /// diagnostic channel and yields `LoggerConfig::default()`.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content, path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Config parse error: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// The filename prefix, substituting the default for an empty value
    pub fn effective_prefix(&self) -> &str {
        if self.file_prefix.is_empty() {
            DEFAULT_FILE_PREFIX
        } else {
            &self.file_prefix
        }
    }

    /// Resolve the directory that holds the log file: `{base}/log`.
    ///
    /// Base is the explicit `base_dir` if set, else the directory of the
    /// running executable, else a home-relative fallback. Failures are
    /// recovered locally and reported on the diagnostic channel.
    pub fn resolve_log_dir(&self) -> PathBuf {
        if let Some(base) = &self.base_dir {
            return base.join(LOG_DIR_NAME);
        }

        match exe_dir() {
            Some(dir) => dir.join(LOG_DIR_NAME),
            None => {
                let fallback = dirs::home_dir()
                    .map(|home| home.join(LOG_DIR_NAME))
                    .unwrap_or_else(|| PathBuf::from(LOG_DIR_NAME));
                warn!(
                    "Cannot resolve executable directory, using {:?}",
                    fallback
                );
                fallback
            }
        }
    }
}

/// Directory of the running executable
fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

// ============================================================================
// Tests
// ============================================================================
