//! Crate-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// File naming
// =============================================================================

/// Filename prefix used when the configured prefix is empty
pub const DEFAULT_FILE_PREFIX: &str = "app";

/// Directory name appended to the resolved base directory
pub const LOG_DIR_NAME: &str = "log";

/// Extension of the backing log file
pub const LOG_FILE_EXTENSION: &str = "log";

/// Date layout of the optional filename suffix (`prefix_YYYYMMDD.log`)
pub const DATE_SUFFIX_FORMAT: &str = "%Y%m%d";

// =============================================================================
// Formatting
// =============================================================================

/// Timestamp layout of the text format and the JSON `time` field
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d_%H:%M:%S%.3f";

/// Reserved field key carrying the secondary message of an emission
pub const MINOR_MSG_KEY: &str = "minor_msg";

// =============================================================================
// Lifecycle monitor
// =============================================================================

/// Default monitor tick for the idle-close check (milliseconds)
pub const DEFAULT_MONITOR_TICK_MS: u64 = 10_000;

/// Default cadence of the daily-rollover check (seconds)
pub const DEFAULT_ROLLOVER_CHECK_SECS: u64 = 600;

/// Default idle-close timeout (seconds)
pub const DEFAULT_IDLE_TIMEOUT_SECS: i64 = 60;

// =============================================================================
// Filesystem
// =============================================================================

/// Permissions of newly created log files (Unix): owner/group writable,
/// world readable
#[cfg(unix)]
pub const LOG_FILE_MODE: u32 = 0o664;
