//! Record formatting
//!
//! Separates encoding from the lifecycle core:
//! - **Formatter**: how a record becomes one output line
//! - **Sink**: where the line goes (handled separately)
//!
//! Two encoders are provided: structured JSON (one object per line) and
//! human-readable text with a fixed timestamp layout.

use crate::config::Format;
use crate::constants::TIMESTAMP_FORMAT;
use crate::record::Record;
use serde_json::{Map, Value};

/// Encodes one record as a single output line (without the trailing newline)
pub trait Formatter: Send + Sync {
    fn format_line(&self, record: &Record) -> String;
}

impl Format {
    /// The formatter implementing this format choice
    pub(crate) fn formatter(self) -> &'static dyn Formatter {
        match self {
            Self::Json => &JsonFormatter,
            Self::Text => &TextFormatter,
        }
    }
}

// =============================================================================
// Text
// =============================================================================

/// Human-readable single-line format:
/// `2024/03/05_14:30:02.123 [INFO] message key=value`
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_line(&self, record: &Record) -> String {
        let mut line = format!(
            "{} [{}] {}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.level.tag(),
            record.message
        );
        for (key, value) in &record.fields {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            match value {
                Value::String(s) => line.push_str(s),
                other => line.push_str(&other.to_string()),
            }
        }
        line
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Structured format: one JSON object per line with `time`, `level`, `msg`
/// and the field set. Reserved keys win over clashing field names.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_line(&self, record: &Record) -> String {
        let mut map = Map::new();
        for (key, value) in &record.fields {
            map.insert(key.clone(), value.clone());
        }
        map.insert(
            "time".to_string(),
            Value::String(record.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        );
        map.insert(
            "level".to_string(),
            Value::String(record.level.name().to_string()),
        );
        map.insert(
            "msg".to_string(),
            Value::String(record.message.clone()),
        );
        Value::Object(map).to_string()
    }
}
