//! Log records and field sets
//!
//! Core types for one emission: the `Record` consumed by the formatter and
//! the `FieldSet` of contextual key/value pairs attached to it.
//!
//! A `FieldSet` is moved into each emission and belongs to exactly one
//! record; fields cannot carry over from one call to the next.

use crate::constants::MINOR_MSG_KEY;
use crate::level::Level;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::collections::BTreeMap;

/// Contextual key/value pairs attached to exactly one emission
///
/// Keys are sorted, so both output formats render fields in a
/// deterministic order.
pub type FieldSet = BTreeMap<String, Value>;

/// One log emission, created per call and consumed by the formatter
#[derive(Debug, Clone)]
pub struct Record {
    /// When the emission was made
    pub timestamp: DateTime<Local>,
    /// Severity of the emission
    pub level: Level,
    /// Main message
    pub message: String,
    /// Field-set snapshot, including the merged secondary message
    pub fields: FieldSet,
}

impl Record {
    /// Build a record from the facade arguments, stamping the current time.
    ///
    /// A non-empty `extra` message is merged into the field set under the
    /// reserved `minor_msg` key; a caller-supplied `minor_msg` field is
    /// overwritten.
    pub fn new(
        level: Level,
        message: impl Into<String>,
        extra: &str,
        mut fields: FieldSet,
    ) -> Self {
        if !extra.is_empty() {
            fields.insert(MINOR_MSG_KEY.to_string(), Value::String(extra.to_string()));
        }
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            fields,
        }
    }
}

/// Build a [`FieldSet`] from `key => value` pairs.
///
/// Values accept anything `serde_json::json!` accepts.
///
/// # Example
///
/// ```
/// use rotolog::fields;
///
/// let fields = fields! { "device" => "midi-0", "attempt" => 3 };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::FieldSet::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::FieldSet::new();
        $( map.insert(($key).to_string(), $crate::__field_value!($value)); )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_message_merged_under_reserved_key() {
        let mut fields = FieldSet::new();
        fields.insert("A".to_string(), json!(1));

        let record = Record::new(Level::Info, "main", "secondary", fields);

        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields["A"], json!(1));
        assert_eq!(record.fields[MINOR_MSG_KEY], json!("secondary"));
    }

    #[test]
    fn test_empty_extra_message_adds_nothing() {
        let record = Record::new(Level::Debug, "main", "", FieldSet::new());
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_caller_supplied_minor_msg_is_overwritten() {
        let mut fields = FieldSet::new();
        fields.insert(MINOR_MSG_KEY.to_string(), json!("caller value"));

        let record = Record::new(Level::Warn, "main", "wins", fields);

        assert_eq!(record.fields[MINOR_MSG_KEY], json!("wins"));
    }

    #[test]
    fn test_fields_macro() {
        let fields = fields! { "A" => 1, "B" => "x" };
        assert_eq!(fields["A"], json!(1));
        assert_eq!(fields["B"], json!("x"));

        let empty = fields! {};
        assert!(empty.is_empty());
    }
}
