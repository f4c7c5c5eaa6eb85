//! Console handler implementation

use crate::core::{
    config::LoggerConfiguration,
    error::Result,
    formatter::{DefaultFormatter, Formatter},
    handler::Handler,
    log_level::LogLevel,
    log_record::LogRecord,
    report::report_to_stderr,
};
use parking_lot::Mutex;
use std::io::{self, Write};

type Sink = Box<dyn Write + Send>;

/// Writes WARN and ERROR records to the error stream, everything else to
/// standard output.
pub struct ConsoleHandler {
    level: LogLevel,
    formatter: Box<dyn Formatter>,
    out: Mutex<Sink>,
    err: Mutex<Sink>,
}

impl ConsoleHandler {
    /// Handler at the configuration's level using a [`DefaultFormatter`].
    pub fn new(config: &LoggerConfiguration) -> Self {
        Self::with_formatter(Box::new(DefaultFormatter::new(config)), config.min_level())
    }

    pub fn with_formatter(formatter: Box<dyn Formatter>, level: LogLevel) -> Self {
        Self {
            level,
            formatter,
            out: Mutex::new(Box::new(io::stdout())),
            err: Mutex::new(Box::new(io::stderr())),
        }
    }

    /// Replace the process streams, e.g. with in-memory buffers
    ///
    /// # Example
    ///
    /// ```
    /// use rust_global_logger::handlers::ConsoleHandler;
    /// use rust_global_logger::LoggerConfiguration;
    ///
    /// let handler = ConsoleHandler::new(&LoggerConfiguration::new())
    ///     .with_streams(Box::new(std::io::sink()), Box::new(std::io::sink()));
    /// ```
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_streams(mut self, out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        self.out = Mutex::new(out);
        self.err = Mutex::new(err);
        self
    }

    fn sink_for(&self, level: LogLevel) -> &Mutex<Sink> {
        if level.is_alert() {
            &self.err
        } else {
            &self.out
        }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new(&LoggerConfiguration::default())
    }
}

impl Handler for ConsoleHandler {
    fn name(&self) -> &str {
        "console"
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn publish(&self, record: &LogRecord) -> Result<()> {
        if !self.is_loggable(record) {
            return Ok(());
        }

        let text = self.formatter.format(record);

        let mut sink = self.sink_for(record.level()).lock();
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    fn flush(&self) {
        for sink in [&self.out, &self.err] {
            if let Err(e) = sink.lock().flush() {
                report_to_stderr("LOGGER ERROR", &format!("Failed to flush console: {}", e));
            }
        }
    }

    fn close(&self) {
        self.flush();
    }
}
