//! Log level definitions and the mapping of backend levels onto them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical severity. Ordering defines filtering: `Trace < Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// All canonical levels in ascending order.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Whether records at this level go to the console error stream.
    pub fn is_alert(&self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() keeps width/alignment flags working, e.g. `{:5}`
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Fine-grained backend level scale.
///
/// Levels are compared by their numeric value, so a `Custom` level carrying
/// the value of a named level is treated exactly like that named level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeLevel {
    Off,
    Severe,
    Warning,
    Info,
    Config,
    Fine,
    Finer,
    Finest,
    All,
    Custom(i32),
}

impl NativeLevel {
    pub fn value(&self) -> i32 {
        match self {
            NativeLevel::Off => i32::MAX,
            NativeLevel::Severe => 1000,
            NativeLevel::Warning => 900,
            NativeLevel::Info => 800,
            NativeLevel::Config => 700,
            NativeLevel::Fine => 500,
            NativeLevel::Finer => 400,
            NativeLevel::Finest => 300,
            NativeLevel::All => i32::MIN,
            NativeLevel::Custom(value) => *value,
        }
    }

    /// Build a level from its numeric value, naming it when the value is known.
    pub fn from_value(value: i32) -> Self {
        match value {
            i32::MAX => NativeLevel::Off,
            1000 => NativeLevel::Severe,
            900 => NativeLevel::Warning,
            800 => NativeLevel::Info,
            700 => NativeLevel::Config,
            500 => NativeLevel::Fine,
            400 => NativeLevel::Finer,
            300 => NativeLevel::Finest,
            i32::MIN => NativeLevel::All,
            other => NativeLevel::Custom(other),
        }
    }
}

/// Conversion of a backend-specific level into a canonical [`LogLevel`].
///
/// Implementations must be pure and total: unknown values map to
/// [`LogLevel::Debug`] instead of failing.
pub trait UnifyLevel {
    fn unify(self) -> LogLevel;
}

impl UnifyLevel for LogLevel {
    #[inline]
    fn unify(self) -> LogLevel {
        self
    }
}

impl UnifyLevel for NativeLevel {
    fn unify(self) -> LogLevel {
        match self.value() {
            1000 => LogLevel::Error,
            900 => LogLevel::Warn,
            800 | 700 => LogLevel::Info,
            500 | 400 => LogLevel::Debug,
            300 => LogLevel::Trace,
            _ => LogLevel::Debug,
        }
    }
}

impl UnifyLevel for log::Level {
    fn unify(self) -> LogLevel {
        match self {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

/// Map any supported backend level onto the canonical scale.
#[inline]
pub fn unify<L: UnifyLevel>(level: L) -> LogLevel {
    level.unify()
}
