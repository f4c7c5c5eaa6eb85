//! Record formatting
//!
//! [`DefaultFormatter`] renders a record as one or more lines, each carrying
//! the same prefix:
//!
//! ```text
//! [08-01-2025 10:30:45.123] [INFO ] [main] [app::Server.start() : 42] Listening
//! ```
//!
//! Prefix fields appear in that fixed order, each only when enabled in the
//! [`LoggerConfiguration`] the formatter was built from.

use super::caller::CallerResolver;
use super::config::LoggerConfiguration;
use super::log_record::{LogRecord, Thrown};
use super::report::report_error;

/// Timestamp layout, rendered in UTC: `dd-MM-yyyy HH:mm:ss.SSS`.
pub const TIMESTAMP_PATTERN: &str = "%d-%m-%Y %H:%M:%S%.3f";

/// Terminator appended to every physical output line.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Turns a record into the text a handler writes to its sink.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

/// The standard line-prefixing formatter.
#[derive(Debug, Clone)]
pub struct DefaultFormatter {
    config: LoggerConfiguration,
    resolver: CallerResolver,
}

impl DefaultFormatter {
    /// Build a formatter from a snapshot of `config`.
    pub fn new(config: &LoggerConfiguration) -> Self {
        let mut resolver = CallerResolver::new(config);
        resolver.exclude_type(std::any::type_name::<Self>());

        Self {
            config: config.clone(),
            resolver,
        }
    }

    pub fn config(&self) -> &LoggerConfiguration {
        &self.config
    }

    pub fn resolver(&self) -> &CallerResolver {
        &self.resolver
    }

    fn timestamp_field(&self, record: &LogRecord) -> String {
        format!("[{}]", record.timestamp().format(TIMESTAMP_PATTERN))
    }

    fn level_field(&self, record: &LogRecord) -> String {
        format!(" [{:5}]", record.level())
    }

    fn thread_field(&self, record: &LogRecord) -> String {
        format!(" [{}]", record.thread_name())
    }

    /// Empty when no frame outside the exclusions could be found.
    fn caller_field(&self) -> String {
        match self.resolver.resolve() {
            Ok(site) => format!(" {}", site),
            Err(_) => String::new(),
        }
    }

    /// Compose the enabled prefix fields.
    pub fn prefix(&self, record: &LogRecord) -> String {
        let mut prefix = String::new();

        if self.config.print_timestamp {
            prefix.push_str(&self.timestamp_field(record));
        }
        if self.config.print_level {
            prefix.push_str(&self.level_field(record));
        }
        if self.config.print_thread_name {
            prefix.push_str(&self.thread_field(record));
        }
        if self.config.print_caller {
            prefix.push_str(&self.caller_field());
        }

        prefix
    }

    /// Trace text of the thrown error, or empty if rendering failed.
    fn throwable_text(&self, thrown: &Thrown) -> String {
        match thrown.render() {
            Ok(text) => text,
            Err(e) => {
                report_error(&format!("Failed to render thrown error for log record: {}", e));
                String::new()
            }
        }
    }
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self::new(&LoggerConfiguration::default())
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let prefix = self.prefix(record);

        let mut body = String::with_capacity(record.message().len() + 1);
        body.push_str(record.message());
        body.push('\n');
        if let Some(thrown) = record.thrown() {
            body.push_str(&self.throwable_text(thrown));
        }

        let mut lines: Vec<&str> = body.lines().collect();
        while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let mut out = String::with_capacity(body.len() + lines.len() * (prefix.len() + 2));
        for line in lines {
            if !prefix.is_empty() {
                out.push_str(&prefix);
                out.push(' ');
            }
            out.push_str(line);
            out.push_str(LINE_SEPARATOR);
        }
        out
    }
}
