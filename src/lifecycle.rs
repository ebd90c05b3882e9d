//! Log-file lifecycle as an explicit state object
//!
//! Owns the decision of when the backing file is open or closed. The open
//! file handle and the composite sink live together inside a single
//! `Option`, so the inconsistent state (handle without sink, or the
//! reverse) is unrepresentable.
//!
//! Shared between the facade and the lifecycle monitor behind one mutex;
//! see `monitor` for the idle-close and rollover policies.

use crate::config::{Format, LoggerConfig};
use crate::constants::{DATE_SUFFIX_FORMAT, LOG_FILE_EXTENSION};
use crate::error::{Error, Result};
use crate::level::Level;
use crate::record::Record;
use crate::sink::{Destination, MultiSink};
use chrono::{DateTime, Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The open file handle (inside the sink) plus the composite sink,
/// present together or not at all
struct ActiveSink {
    path: PathBuf,
    sink: MultiSink,
}

/// Owning state of the facade: sink lifecycle, filtering and timestamps
pub(crate) struct LoggerState {
    dir: PathBuf,
    prefix: String,
    date_suffix: bool,
    console: bool,
    format: Format,
    pub(crate) level: Level,
    pub(crate) idle_timeout_secs: i64,
    active: Option<ActiveSink>,
    last_activity: Instant,
    last_open: DateTime<Local>,
}

impl LoggerState {
    pub(crate) fn new(config: &LoggerConfig, dir: PathBuf) -> Self {
        Self {
            dir,
            prefix: config.effective_prefix().to_string(),
            date_suffix: config.date_suffix,
            console: config.console,
            format: config.format,
            level: config.level,
            idle_timeout_secs: config.idle_timeout_secs,
            active: None,
            last_activity: Instant::now(),
            last_open: Local::now(),
        }
    }

    // =========================================================================
    // State queries
    // =========================================================================

    /// True iff the file handle and composite sink are present
    pub(crate) fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Time since the last emission attempt
    pub(crate) fn idle_elapsed(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Calendar day the current file was opened on
    pub(crate) fn last_open_day(&self) -> NaiveDate {
        self.last_open.date_naive()
    }

    /// Target path of the backing file for the given moment:
    /// `{dir}/{prefix}[_{YYYYMMDD}].log`
    pub(crate) fn log_file_path(&self, now: DateTime<Local>) -> PathBuf {
        let filename = if self.date_suffix {
            format!(
                "{}_{}.{}",
                self.prefix,
                now.format(DATE_SUFFIX_FORMAT),
                LOG_FILE_EXTENSION
            )
        } else {
            format!("{}.{}", self.prefix, LOG_FILE_EXTENSION)
        };
        self.dir.join(filename)
    }

    // =========================================================================
    // Lifecycle transitions
    // =========================================================================

    /// Open the backing file if it is not already open.
    ///
    /// Creates the log directory if missing, opens the dated (or plain) file
    /// for append, and builds the composite sink from the file plus the
    /// console when mirroring is on. Records last-open and resets the
    /// activity clock. Calling on an already-open state is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the directory or open failure; the state stays closed, so
    /// every later call retries.
    pub(crate) fn ensure_open(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir).map_err(|e| Error::CreateDirectory {
            path: self.dir.clone(),
            source: e,
        })?;

        let now = Local::now();
        let path = self.log_file_path(now);

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(crate::constants::LOG_FILE_MODE);
        }
        let file = options.open(&path).map_err(|e| Error::FileOpen {
            path: path.clone(),
            source: e,
        })?;

        let mut destinations = vec![Destination::file(file)];
        if self.console {
            destinations.push(Destination::console());
        }

        info!(path = %path.display(), "log file opened");
        self.active = Some(ActiveSink {
            path,
            sink: MultiSink::new(destinations),
        });
        self.last_open = now;
        self.last_activity = Instant::now();
        Ok(())
    }

    /// Flush and release the backing file; no-op when already closed
    pub(crate) fn close(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.sink.flush();
            debug!(path = %active.path.display(), "log file closed");
        }
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Encode and write one record through the active sink.
    ///
    /// Records below the configured minimum are suppressed here, at the
    /// emitter layer; the facade updates activity either way. When no sink
    /// is open (file open failed), the record degrades to console-only.
    pub(crate) fn emit(&mut self, record: &Record) {
        if record.level > self.level {
            return;
        }
        let line = self.format.formatter().format_line(record);
        match self.active.as_mut() {
            Some(active) => active.sink.write_line(&line),
            None => MultiSink::console_only().write_line(&line),
        }
    }

    /// Stamp the activity clock; attempting to log counts as activity
    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    #[cfg(test)]
    pub(crate) fn set_last_open(&mut self, when: DateTime<Local>) {
        self.last_open = when;
    }

    #[cfg(test)]
    pub(crate) fn active_destination_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.sink.len())
    }
}
