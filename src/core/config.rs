//! Handler/formatter configuration
//!
//! A [`LoggerConfiguration`] is a plain value: handlers and formatters copy
//! what they need when they are built, so changing a configuration afterwards
//! never affects a handler that already exists.

use super::error::Result;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Settings consumed by a formatter/handler pair at construction time.
///
/// # Examples
///
/// ```
/// use rust_global_logger::{LogLevel, LoggerConfiguration};
///
/// let config = LoggerConfiguration::new()
///     .level(LogLevel::Debug)
///     .print_thread_name(false)
///     .excluded_caller_modules(["my_app::logging"]);
/// assert_eq!(config.min_level(), LogLevel::Debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfiguration {
    pub level: Option<LogLevel>,
    /// Fully qualified type paths whose frames are never reported as the caller
    pub excluded_caller_types: Vec<String>,
    /// Path prefixes; frames whose type path starts with one are never reported as the caller
    pub excluded_caller_modules: Vec<String>,
    pub print_timestamp: bool,
    pub print_level: bool,
    pub print_thread_name: bool,
    pub print_caller: bool,
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self {
            level: None,
            excluded_caller_types: Vec::new(),
            excluded_caller_modules: Vec::new(),
            print_timestamp: true,
            print_level: true,
            print_thread_name: true,
            print_caller: true,
        }
    }
}

impl LoggerConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON; missing fields keep their defaults.
    ///
    /// ```
    /// use rust_global_logger::{LogLevel, LoggerConfiguration};
    ///
    /// let config = LoggerConfiguration::from_json(r#"{"level":"Warn","print_caller":false}"#).unwrap();
    /// assert_eq!(config.level, Some(LogLevel::Warn));
    /// assert!(!config.print_caller);
    /// assert!(config.print_timestamp);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Minimum level, `Trace` (everything) when none was set.
    pub fn min_level(&self) -> LogLevel {
        self.level.unwrap_or(LogLevel::Trace)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn excluded_caller_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_caller_types = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn excluded_caller_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_caller_modules = modules.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn print_timestamp(mut self, value: bool) -> Self {
        self.print_timestamp = value;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn print_level(mut self, value: bool) -> Self {
        self.print_level = value;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn print_thread_name(mut self, value: bool) -> Self {
        self.print_thread_name = value;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn print_caller(mut self, value: bool) -> Self {
        self.print_caller = value;
        self
    }

    /// Disable every prefix field at once.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn bare(self) -> Self {
        self.print_timestamp(false)
            .print_level(false)
            .print_thread_name(false)
            .print_caller(false)
    }
}
