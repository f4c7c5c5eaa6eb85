//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes either a format string, logging through the global
//! logger, or an explicit logger followed by a format string. The message
//! is only formatted when the level is enabled.
//!
//! # Examples
//!
//! ```
//! use rust_global_logger::{info, Logger};
//!
//! // Global logger
//! info!("Server started");
//!
//! // Explicit logger with format arguments
//! let logger = Logger::new("local");
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// use rust_global_logger::{log, LogLevel, NativeLevel};
///
/// log!(LogLevel::Info, "Simple message");
/// log!(NativeLevel::Severe, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $fmt:literal $($arg:tt)*) => {{
        let logger = $crate::global();
        $crate::log!(logger, $level, $fmt $($arg)*)
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $crate::unify($level);
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+))
        }
    }};
}

/// Log a trace-level message.
///
/// ```
/// use rust_global_logger::trace;
/// trace!("Entering function: calculate()");
/// trace!("Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Trace, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Debug, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// use rust_global_logger::info;
/// info!("Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Info, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Warn, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// use rust_global_logger::error;
/// error!("Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Error, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
