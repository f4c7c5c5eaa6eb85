//! Core logger types and traits

pub mod caller;
pub mod config;
pub mod error;
pub mod formatter;
pub mod handler;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod registry;
pub(crate) mod report;

pub use caller::{CallSite, CallerResolver, MAX_STACK_DEPTH};
pub use config::LoggerConfiguration;
pub use error::{LoggerError, Result};
pub use formatter::{DefaultFormatter, Formatter, LINE_SEPARATOR, TIMESTAMP_PATTERN};
pub use handler::Handler;
pub use log_level::{unify, LogLevel, NativeLevel, UnifyLevel};
pub use log_record::{LogRecord, Thrown};
pub use logger::{Logger, GLOBAL_LOGGER_NAME};
pub use metrics::LoggerMetrics;
pub use registry::{global, install_panic_hook, registry, LoggerRegistry, PanicError};
