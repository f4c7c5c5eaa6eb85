//! # Rust Global Logger
//!
//! A synchronous structured-logging core built around one process-wide
//! logger. Records are formatted with a configurable prefix (timestamp,
//! level, thread, call site) and routed to level-gated handlers.
//!
//! ## Features
//!
//! - **Single Global Logger**: every name resolves to the same shared instance
//! - **Call-Site Resolution**: the first stack frame outside logging code is reported
//! - **Multi-Line Output**: every line of a message and its error chain carries the prefix
//! - **Console and File Handlers**: alert levels go to stderr, files rotate by size
//! - **`log` Bridge**: records from the `log` crate flow into the same pipeline
//!
//! ## Example
//!
//! ```no_run
//! use rust_global_logger::{global as log, info, LogLevel, LoggerConfiguration};
//!
//! log::configure(&LoggerConfiguration::new().level(LogLevel::Debug));
//!
//! log::info("Listening");
//! info!("Accepted {} connections", 3);
//! ```

pub mod bridge;
pub mod core;
pub mod global;
pub mod handlers;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::handlers::ConsoleHandler;
    #[cfg(feature = "file")]
    pub use crate::handlers::{FileHandler, FileTarget};
    pub use crate::core::{
        CallSite, CallerResolver, DefaultFormatter, Formatter, Handler, LogLevel, LogRecord,
        Logger, LoggerConfiguration, LoggerError, LoggerMetrics, LoggerRegistry, NativeLevel,
        Result, Thrown, UnifyLevel,
    };
}

pub use bridge::{init_log_bridge, LogBridge};
pub use core::{
    install_panic_hook, registry, unify, CallSite, CallerResolver, DefaultFormatter, Formatter,
    Handler, LogLevel, LogRecord, Logger, LoggerConfiguration, LoggerError, LoggerMetrics,
    LoggerRegistry, NativeLevel, PanicError, Result, Thrown, UnifyLevel, GLOBAL_LOGGER_NAME,
    LINE_SEPARATOR, TIMESTAMP_PATTERN,
};
pub use global::global;
#[cfg(feature = "console")]
pub use handlers::ConsoleHandler;
#[cfg(feature = "file")]
pub use handlers::{FileHandler, FileTarget, RotatingFileWriter};
