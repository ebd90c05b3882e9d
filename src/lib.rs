//! Structured-logging facade with a lazily-opened, time-rotated log file
//!
//! Centralizes the log-file lifecycle behind one entry point:
//! - the backing file opens on first emission and closes after inactivity
//!   or a calendar-day change, driven by an owned background monitor
//! - every emission fans out to the file and, optionally, the console
//! - structured fields attach to exactly one emission
//! - panic/fatal severities report an [`Escalation`] instead of terminating
//!   inside the logging call
//!
//! # Quick start
//!
//! ```no_run
//! use rotolog::{fields, Level, Logger, LoggerConfig};
//!
//! let logger = Logger::init(LoggerConfig {
//!     level: Level::Debug,
//!     file_prefix: "svc".to_string(),
//!     ..Default::default()
//! })
//! .expect("logger init");
//!
//! logger.info("service started");
//! logger
//!     .with_fields(fields! { "port" => 9000 })
//!     .warn("bind retried");
//!
//! logger.shutdown();
//! ```

mod config;
mod constants;
mod error;
mod format;
mod level;
mod lifecycle;
mod logger;
mod monitor;
mod record;
mod sink;

pub use config::{Format, LoggerConfig};
pub use error::{Error, Result};
pub use format::{Formatter, JsonFormatter, TextFormatter};
pub use level::Level;
pub use logger::{Entry, Escalation, Logger};
pub use record::{FieldSet, Record};
pub use sink::{Destination, MultiSink};

#[doc(hidden)]
pub use serde_json::json as __field_value;

/// Initialize the facade's own diagnostic output
///
/// The facade reports its operational notices (file opened, idle-close,
/// degraded sinks) through `tracing`. Call this early in `main()` to see
/// them on stderr; set `verbose` to true for debug-level output. Embedders
/// with their own subscriber can skip this.
pub fn init_diagnostics(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}
