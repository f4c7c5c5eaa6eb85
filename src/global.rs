//! Free functions over the process-wide logger
//!
//! Every call resolves the shared logger through the global
//! [`LoggerRegistry`](crate::LoggerRegistry), so records from the whole
//! process go through one set of handlers.
//!
//! ```no_run
//! use rust_global_logger::global as log;
//!
//! log::configure_default();
//! log::info("service started");
//! log::entry_with(&[&8080, &"0.0.0.0"]);
//! ```

use crate::core::{
    error::{LoggerError, Result},
    handler::Handler,
    log_level::{LogLevel, UnifyLevel},
    log_record::Thrown,
    logger::Logger,
    registry,
};
use std::fmt::{Debug, Write};
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "console")]
use crate::core::config::LoggerConfiguration;
#[cfg(feature = "console")]
use crate::handlers::ConsoleHandler;

/// Folder created by [`create_default_log_folder`].
pub const DEFAULT_LOG_FOLDER: &str = "./logs";

/// The process-wide logger.
pub fn global() -> Arc<Logger> {
    registry::global()
}

pub fn name() -> String {
    global().name().to_string()
}

/// Console handler and logger level TRACE.
#[cfg(feature = "console")]
pub fn configure_default() {
    configure(&LoggerConfiguration::new().level(LogLevel::Trace));
}

/// Console handler built from `config`, logger level from `config`.
#[cfg(feature = "console")]
pub fn configure(config: &LoggerConfiguration) {
    configure_with_handlers(config.min_level(), vec![Arc::new(ConsoleHandler::new(config))]);
}

/// Replace the global logger's handlers, closing the previous ones.
pub fn configure_with_handlers(level: LogLevel, handlers: Vec<Arc<dyn Handler>>) {
    global().configure(level, handlers);
}

pub fn log(level: impl UnifyLevel, message: impl Into<String>) {
    global().log(level, message);
}

pub fn trace(message: impl Into<String>) {
    global().trace(message);
}

pub fn debug(message: impl Into<String>) {
    global().debug(message);
}

pub fn info(message: impl Into<String>) {
    global().info(message);
}

pub fn warn(message: impl Into<String>) {
    global().warn(message);
}

pub fn error(message: impl Into<String>) {
    global().error(message);
}

pub fn trace_with_error(message: impl Into<String>, thrown: Thrown) {
    global().trace_with_error(message, thrown);
}

pub fn debug_with_error(message: impl Into<String>, thrown: Thrown) {
    global().debug_with_error(message, thrown);
}

pub fn info_with_error(message: impl Into<String>, thrown: Thrown) {
    global().info_with_error(message, thrown);
}

pub fn warn_with_error(message: impl Into<String>, thrown: Thrown) {
    global().warn_with_error(message, thrown);
}

pub fn error_with_error(message: impl Into<String>, thrown: Thrown) {
    global().error_with_error(message, thrown);
}

pub fn is_trace_enabled() -> bool {
    global().is_trace_enabled()
}

pub fn is_debug_enabled() -> bool {
    global().is_debug_enabled()
}

pub fn is_info_enabled() -> bool {
    global().is_info_enabled()
}

pub fn is_warn_enabled() -> bool {
    global().is_warn_enabled()
}

pub fn is_error_enabled() -> bool {
    global().is_error_enabled()
}

/// TRACE `ENTRY` marking the start of a method.
pub fn entry() {
    trace("ENTRY");
}

/// TRACE `ENTRY [v1][v2]…` with the method's argument values.
pub fn entry_with(values: &[&dyn Debug]) {
    let logger = global();
    if logger.is_trace_enabled() {
        logger.trace(entry_message(values));
    }
}

/// TRACE `EXIT` marking the end of a method.
pub fn exit() {
    trace("EXIT");
}

/// TRACE `EXIT [return = value]`.
pub fn exit_with(value: &dyn Debug) {
    let logger = global();
    if logger.is_trace_enabled() {
        logger.trace(exit_message(value));
    }
}

fn entry_message(values: &[&dyn Debug]) -> String {
    let mut message = String::from("ENTRY ");
    for value in values {
        let _ = write!(message, "[{:?}]", value);
    }
    message
}

fn exit_message(value: &dyn Debug) -> String {
    format!("EXIT [return = {:?}]", value)
}

/// Create [`DEFAULT_LOG_FOLDER`] if it does not exist.
pub fn create_default_log_folder() -> Result<()> {
    create_log_folder(DEFAULT_LOG_FOLDER)
}

/// Create `path` and any missing parents.
pub fn create_log_folder(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|e| {
        LoggerError::io_operation(
            "create log folder",
            format!("Failed to create '{}'", path.display()),
            e,
        )
    })
}
