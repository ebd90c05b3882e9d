//! Severity levels
//!
//! Ascending verbosity: `Panic` is the most severe and least verbose,
//! `Debug` the least severe and most verbose. The derived ordering follows
//! declaration order, so `record_level <= minimum` answers "is this record
//! loud enough to emit".

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity, ascending verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Most severe; emission asks the caller to unwind
    Panic,
    /// Emission asks the caller to terminate the process
    Fatal,
    Error,
    Warn,
    Info,
    /// Least severe; most verbose
    Debug,
}

impl Level {
    /// Uppercase tag used by the text format
    pub fn tag(self) -> &'static str {
        match self {
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Lowercase name, matching the serde encoding
    pub fn name(self) -> &'static str {
        match self {
            Self::Panic => "panic",
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for Level {
    type Error = Error;

    /// Numeric lookup for callers holding a raw severity value.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLevel` for values outside `0..=5`; the caller's
    /// state is untouched.
    fn try_from(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Panic),
            1 => Ok(Self::Fatal),
            2 => Ok(Self::Error),
            3 => Ok(Self::Warn),
            4 => Ok(Self::Info),
            5 => Ok(Self::Debug),
            _ => Err(Error::InvalidLevel {
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "panic" => Ok(Self::Panic),
            "fatal" => Ok(Self::Fatal),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(Error::InvalidLevel {
                value: s.to_string(),
            }),
        }
    }
}
