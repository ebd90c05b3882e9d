//! Logging facade
//!
//! The public entry point. Every emission:
//! 1. asks the lifecycle state to guarantee an open sink (degrading to
//!    console-only on failure, with a diagnostic notice)
//! 2. merges the optional secondary message into the field set
//! 3. dispatches the record to the formatter bound to the current sink
//! 4. stamps the activity clock, whether or not the record was emitted
//!
//! Field sets are moved into each call, so nothing can leak into the next
//! emission. Panic- and fatal-level calls do not unwind or exit here; they
//! return an [`Escalation`] the caller acts on.

use crate::config::LoggerConfig;
use crate::error::Result;
use crate::level::Level;
use crate::lifecycle::LoggerState;
use crate::monitor::{self, MonitorHandle, MonitorSettings};
use crate::record::{FieldSet, Record};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

// =============================================================================
// Escalation
// =============================================================================

/// Control-flow effect requested by an emission.
///
/// Panic- and fatal-level records are deliberate termination requests; the
/// facade reports them as a value instead of unwinding or exiting inside
/// the logging call, so severity dispatch stays testable. Call
/// [`Escalation::trigger`] to perform the requested effect.
#[must_use = "panic- and fatal-level emissions ask the caller to escalate; match on the value or call trigger()"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Control flow continues normally
    None,
    /// A panic-level record was written; the caller should unwind
    Panic,
    /// A fatal-level record was written; the caller should terminate
    Exit,
}

impl Escalation {
    /// The effect a given severity requests
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Panic => Self::Panic,
            Level::Fatal => Self::Exit,
            _ => Self::None,
        }
    }

    /// True when no escalation is requested
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// Perform the requested effect: unwind for `Panic`, terminate the
    /// process for `Exit`, nothing otherwise
    pub fn trigger(self) {
        match self {
            Self::None => {}
            Self::Panic => panic!("panic-level log emitted"),
            Self::Exit => std::process::exit(1),
        }
    }
}

// =============================================================================
// Facade
// =============================================================================

/// Structured-logging facade over a lazily-opened, time-rotated log file.
///
/// Created once by [`Logger::init`]; safe to share across threads. The
/// backing file opens on first emission and is closed by the owned
/// background monitor after inactivity or a calendar-day change; the next
/// emission transparently reopens it.
///
/// # Example
///
/// ```no_run
/// use rotolog::{fields, Level, Logger, LoggerConfig};
///
/// let logger = Logger::init(LoggerConfig::default()).unwrap();
/// logger.info("service started");
/// logger
///     .with_fields(fields! { "device" => "midi-0" })
///     .warn("device slow to respond");
/// ```
pub struct Logger {
    state: Arc<Mutex<LoggerState>>,
    monitor: Option<MonitorHandle>,
}

impl Logger {
    /// Create the facade and start its lifecycle monitor.
    ///
    /// The backing file is not opened here; the first emission opens it.
    ///
    /// # Errors
    ///
    /// Returns an error if the monitor thread cannot be spawned.
    pub fn init(config: LoggerConfig) -> Result<Self> {
        let dir = config.resolve_log_dir();
        let state = Arc::new(Mutex::new(LoggerState::new(&config, dir)));

        let settings = MonitorSettings {
            tick: Duration::from_millis(config.monitor_tick_ms.max(1)),
            rollover_check: Duration::from_secs(config.rollover_check_secs.max(1)),
        };
        let monitor = monitor::spawn(state.clone(), settings)?;

        Ok(Self {
            state,
            monitor: Some(monitor),
        })
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Emit one record with an optional secondary message and a field set.
    ///
    /// The field set belongs to this emission alone. A non-empty `extra`
    /// message lands in the fields under the reserved `minor_msg` key.
    /// Records below the configured minimum are suppressed by the emitter,
    /// but the emission still counts as activity.
    pub fn log(
        &self,
        level: Level,
        message: impl Into<String>,
        extra: &str,
        fields: FieldSet,
    ) -> Escalation {
        let record = Record::new(level, message, extra, fields);

        let mut state = self.state.lock();
        if let Err(e) = state.ensure_open() {
            warn!(error = %e, "log file unavailable, degrading to console only");
        }
        state.emit(&record);
        state.touch();

        Escalation::for_level(level)
    }

    /// Attach a field set to exactly one subsequent emission.
    ///
    /// The returned [`Entry`] is consumed by its emit call; fields are not
    /// cumulative across calls and must be re-supplied per statement.
    pub fn with_fields(&self, fields: FieldSet) -> Entry<'_> {
        Entry {
            logger: self,
            fields,
        }
    }

    /// Emit at panic level and return the escalation request
    pub fn panic(&self, message: impl Into<String>) -> Escalation {
        self.log(Level::Panic, message, "", FieldSet::new())
    }

    /// Emit at fatal level and return the escalation request
    pub fn fatal(&self, message: impl Into<String>) -> Escalation {
        self.log(Level::Fatal, message, "", FieldSet::new())
    }

    /// Emit at error level
    pub fn error(&self, message: impl Into<String>) {
        let _ = self.log(Level::Error, message, "", FieldSet::new());
    }

    /// Emit at warn level
    pub fn warn(&self, message: impl Into<String>) {
        let _ = self.log(Level::Warn, message, "", FieldSet::new());
    }

    /// Emit at info level
    pub fn info(&self, message: impl Into<String>) {
        let _ = self.log(Level::Info, message, "", FieldSet::new());
    }

    /// Emit at debug level
    pub fn debug(&self, message: impl Into<String>) {
        let _ = self.log(Level::Debug, message, "", FieldSet::new());
    }

    // =========================================================================
    // Runtime control
    // =========================================================================

    /// Change the minimum emitted severity
    pub fn set_level(&self, level: Level) {
        self.state.lock().level = level;
    }

    /// Change the minimum severity from its name.
    ///
    /// # Errors
    ///
    /// An unrecognized name returns `Error::InvalidLevel` and leaves the
    /// current level unchanged.
    pub fn set_level_by_name(&self, name: &str) -> Result<()> {
        let level = name.parse::<Level>()?;
        self.state.lock().level = level;
        Ok(())
    }

    /// The current minimum severity
    pub fn level(&self) -> Level {
        self.state.lock().level
    }

    /// True iff the backing file is currently open
    pub fn is_open(&self) -> bool {
        self.state.lock().is_open()
    }

    /// Flush and release the backing file; the next emission reopens it
    pub fn close(&self) {
        self.state.lock().close();
    }

    /// Stop the lifecycle monitor and release the backing file.
    ///
    /// Dropping the logger does the same; this method makes the teardown
    /// point explicit.
    pub fn shutdown(mut self) {
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
        self.state.lock().close();
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
        self.state.lock().close();
    }
}

// =============================================================================
// Entry
// =============================================================================

/// A field set bound to one pending emission.
///
/// Produced by [`Logger::with_fields`]; every emit method consumes the
/// entry, so the snapshot is used exactly once.
pub struct Entry<'a> {
    logger: &'a Logger,
    fields: FieldSet,
}

impl Entry<'_> {
    /// Emit one record carrying the attached fields
    pub fn log(self, level: Level, message: impl Into<String>, extra: &str) -> Escalation {
        self.logger.log(level, message, extra, self.fields)
    }

    /// Emit at panic level and return the escalation request
    pub fn panic(self, message: impl Into<String>) -> Escalation {
        self.log(Level::Panic, message, "")
    }

    /// Emit at fatal level and return the escalation request
    pub fn fatal(self, message: impl Into<String>) -> Escalation {
        self.log(Level::Fatal, message, "")
    }

    /// Emit at error level
    pub fn error(self, message: impl Into<String>) {
        let _ = self.log(Level::Error, message, "");
    }

    /// Emit at warn level
    pub fn warn(self, message: impl Into<String>) {
        let _ = self.log(Level::Warn, message, "");
    }

    /// Emit at info level
    pub fn info(self, message: impl Into<String>) {
        let _ = self.log(Level::Info, message, "");
    }

    /// Emit at debug level
    pub fn debug(self, message: impl Into<String>) {
        let _ = self.log(Level::Debug, message, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Format;
    use crate::fields;
    use std::fs;
    use std::path::PathBuf;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let base = std::env::temp_dir();
        let pid = std::process::id();
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        base.join(format!("rotolog-facade-{}-{}-{}", tag, pid, ts))
    }

    fn test_config(base: &PathBuf) -> LoggerConfig {
        LoggerConfig {
            level: Level::Debug,
            format: Format::Json,
            file_prefix: "svc".to_string(),
            date_suffix: false,
            console: false,
            idle_timeout_secs: 3600,
            base_dir: Some(base.clone()),
            monitor_tick_ms: 60_000,
            rollover_check_secs: 3600,
        }
    }

    fn read_log_lines(base: &PathBuf) -> Vec<serde_json::Value> {
        let content = fs::read_to_string(base.join("log").join("svc.log")).unwrap();
        content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    // === Emission tests ===

    #[test]
    fn test_fields_and_extra_message_roundtrip() {
        let base = unique_temp_dir("roundtrip");
        let logger = Logger::init(test_config(&base)).unwrap();

        let escalation =
            logger
                .with_fields(fields! { "A" => 1, "B" => "x" })
                .log(Level::Info, "main", "extra");
        assert!(escalation.is_none());
        logger.shutdown();

        let lines = read_log_lines(&base);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["A"], serde_json::json!(1));
        assert_eq!(lines[0]["B"], serde_json::json!("x"));
        assert_eq!(lines[0]["minor_msg"], serde_json::json!("extra"));
        assert_eq!(lines[0]["msg"], serde_json::json!("main"));

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_no_field_leakage_between_emissions() {
        let base = unique_temp_dir("leak");
        let logger = Logger::init(test_config(&base)).unwrap();

        logger.with_fields(fields! { "A" => 1 }).info("first");
        logger.info("second");
        logger.shutdown();

        let lines = read_log_lines(&base);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["A"], serde_json::json!(1));
        assert!(lines[1].get("A").is_none(), "fields leaked: {}", lines[1]);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_suppressed_emission_still_counts_as_activity() {
        let base = unique_temp_dir("suppressed");
        let mut config = test_config(&base);
        config.level = Level::Warn;
        let logger = Logger::init(config).unwrap();

        // Below minimum: nothing written, but the file opens and the
        // emission counts as activity
        logger.debug("quiet");
        assert!(logger.is_open());
        logger.shutdown();

        let content = fs::read_to_string(base.join("log").join("svc.log")).unwrap();
        assert!(content.is_empty());

        let _ = fs::remove_dir_all(&base);
    }

    // === Escalation tests ===

    #[test]
    fn test_escalation_mapping() {
        let base = unique_temp_dir("escalate");
        let logger = Logger::init(test_config(&base)).unwrap();

        assert_eq!(logger.panic("unwind"), Escalation::Panic);
        assert_eq!(logger.fatal("terminate"), Escalation::Exit);
        assert_eq!(
            logger.log(Level::Error, "continue", "", FieldSet::new()),
            Escalation::None
        );
        logger.shutdown();

        // All three records were written before any escalation
        let lines = read_log_lines(&base);
        assert_eq!(lines.len(), 3);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    #[should_panic(expected = "panic-level log emitted")]
    fn test_trigger_panic_unwinds() {
        Escalation::Panic.trigger();
    }

    #[test]
    fn test_trigger_none_is_a_no_op() {
        Escalation::None.trigger();
    }

    // === Runtime control tests ===

    #[test]
    fn test_set_level_by_name_invalid_leaves_level_unchanged() {
        let base = unique_temp_dir("level");
        let logger = Logger::init(test_config(&base)).unwrap();

        logger.set_level(Level::Warn);
        assert!(logger.set_level_by_name("verbose").is_err());
        assert_eq!(logger.level(), Level::Warn);

        logger.set_level_by_name("debug").unwrap();
        assert_eq!(logger.level(), Level::Debug);

        logger.shutdown();
        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_close_then_emit_reopens() {
        let base = unique_temp_dir("reopen");
        let logger = Logger::init(test_config(&base)).unwrap();

        logger.info("opens the file");
        assert!(logger.is_open());

        logger.close();
        assert!(!logger.is_open());

        logger.info("reopens the file");
        assert!(logger.is_open());

        logger.shutdown();
        let _ = fs::remove_dir_all(&base);
    }

    // === Concurrency tests ===

    #[test]
    fn test_concurrent_emitters_with_aggressive_monitor() {
        let base = unique_temp_dir("race");
        let mut config = test_config(&base);
        // Close as fast as the monitor can; every emission races a close
        config.idle_timeout_secs = 0;
        config.monitor_tick_ms = 5;
        let logger = Arc::new(Logger::init(config).unwrap());

        let mut handles = Vec::new();
        for thread_id in 0..4 {
            let logger = logger.clone();
            handles.push(std::thread::spawn(move || {
                for seq in 0..25 {
                    logger
                        .with_fields(fields! { "thread" => thread_id, "seq" => seq })
                        .info("tick");
                    std::thread::sleep(Duration::from_millis(2));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        match Arc::try_unwrap(logger) {
            Ok(logger) => logger.shutdown(),
            Err(_) => panic!("logger still shared"),
        }

        // Every line made it to the (append-mode) file intact
        let lines = read_log_lines(&base);
        assert_eq!(lines.len(), 100);
        for line in &lines {
            assert!(line.get("thread").is_some());
            assert!(line.get("seq").is_some());
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_shutdown_is_prompt_despite_long_tick() {
        let base = unique_temp_dir("shutdown");
        let mut config = test_config(&base);
        config.monitor_tick_ms = 3_600_000;
        let logger = Logger::init(config).unwrap();

        let started = std::time::Instant::now();
        logger.shutdown();
        assert!(started.elapsed() < Duration::from_secs(5));

        let _ = fs::remove_dir_all(&base);
    }
}
