//! File handler implementation

use super::rotating_file::{FileTarget, RotatingFileWriter};
use crate::core::{
    config::LoggerConfiguration,
    error::{LoggerError, Result},
    formatter::{DefaultFormatter, Formatter},
    handler::Handler,
    log_level::LogLevel,
    log_record::LogRecord,
    report::report_to_stderr,
};
use parking_lot::Mutex;
use std::path::PathBuf;

/// Appends formatted records to a [`RotatingFileWriter`].
///
/// # Examples
///
/// ```no_run
/// use rust_global_logger::handlers::{FileHandler, FileTarget};
/// use rust_global_logger::LoggerConfiguration;
///
/// let handler = FileHandler::new(
///     &LoggerConfiguration::new(),
///     FileTarget::new("logs/app%u.log").with_append(true),
/// )
/// .unwrap();
/// ```
pub struct FileHandler {
    level: LogLevel,
    formatter: Box<dyn Formatter>,
    writer: Mutex<Option<RotatingFileWriter>>,
}

impl FileHandler {
    /// # Errors
    ///
    /// Returns error if the target's file cannot be locked or opened
    pub fn new(config: &LoggerConfiguration, target: FileTarget) -> Result<Self> {
        Self::with_formatter(Box::new(DefaultFormatter::new(config)), config.min_level(), target)
    }

    /// # Errors
    ///
    /// Returns error if the target's file cannot be locked or opened
    pub fn with_formatter(
        formatter: Box<dyn Formatter>,
        level: LogLevel,
        target: FileTarget,
    ) -> Result<Self> {
        let writer = RotatingFileWriter::open(target)?;

        Ok(Self {
            level,
            formatter,
            writer: Mutex::new(Some(writer)),
        })
    }

    /// Active file, `None` once closed
    pub fn path(&self) -> Option<PathBuf> {
        self.writer.lock().as_ref().map(|w| w.path().to_path_buf())
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }
}

impl Handler for FileHandler {
    fn name(&self) -> &str {
        "file"
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn publish(&self, record: &LogRecord) -> Result<()> {
        if !self.is_loggable(record) {
            return Ok(());
        }

        let text = self.formatter.format(record);

        let mut guard = self.writer.lock();
        let writer = guard
            .as_mut()
            .ok_or_else(|| LoggerError::HandlerClosed(self.name().to_string()))?;
        writer.write_record(&text)
    }

    fn flush(&self) {
        if let Some(writer) = self.writer.lock().as_mut() {
            if let Err(e) = writer.flush() {
                report_to_stderr("LOGGER ERROR", &e.to_string());
            }
        }
    }

    fn close(&self) {
        if let Some(writer) = self.writer.lock().take() {
            writer.close();
        }
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        self.close();
    }
}
