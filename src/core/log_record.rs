//! Log record structure

use super::error::{LoggerError, Result};
use super::log_level::{LogLevel, UnifyLevel};
use backtrace::Backtrace;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{self, Write};
use std::sync::Arc;

// Thread names cannot change after spawn, so one lookup per thread is enough
thread_local! {
    static THREAD_NAME_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Name of the current thread, falling back to its id for unnamed threads
fn current_thread_name() -> String {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let thread = std::thread::current();
                match thread.name() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", thread.id()),
                }
            })
            .clone()
    })
}

/// Error payload attached to a record, optionally with the stack it was raised on.
#[derive(Clone)]
pub struct Thrown {
    error: Arc<dyn Error + Send + Sync + 'static>,
    backtrace: Option<Arc<Backtrace>>,
}

impl Thrown {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            error: Arc::new(error),
            backtrace: None,
        }
    }

    /// Wrap `error` and capture the current stack alongside it.
    pub fn with_backtrace<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            error: Arc::new(error),
            backtrace: Some(Arc::new(Backtrace::new())),
        }
    }

    pub fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self {
            error: Arc::from(error),
            backtrace: None,
        }
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_deref()
    }

    /// Render the error, its `source()` chain and the captured stack as text.
    ///
    /// Fails with [`LoggerError::FormatterError`] only if one of the `Display`
    /// implementations in the chain fails.
    pub fn render(&self) -> Result<String> {
        self.write_trace().map_err(|e| LoggerError::formatter("trace", e.to_string()))
    }

    fn write_trace(&self) -> std::result::Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{}", self.error)?;

        let mut source = self.error.source();
        while let Some(cause) = source {
            writeln!(out, "Caused by: {}", cause)?;
            source = cause.source();
        }

        if let Some(ref backtrace) = self.backtrace {
            write!(out, "{:?}", backtrace)?;
        }
        Ok(out)
    }
}

impl fmt::Debug for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thrown")
            .field("error", &format_args!("{}", self.error))
            .field("backtrace", &self.backtrace.is_some())
            .finish()
    }
}

/// A single log event. Immutable once built.
#[derive(Debug, Clone)]
pub struct LogRecord {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    message: String,
    thread_name: String,
    thrown: Option<Thrown>,
    logger_name: String,
}

impl LogRecord {
    /// Build a record stamped with the current instant and thread.
    pub fn new(
        level: impl UnifyLevel,
        message: impl Into<String>,
        logger_name: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level: level.unify(),
            message: message.into(),
            thread_name: current_thread_name(),
            thrown: None,
            logger_name: logger_name.into(),
        }
    }

    #[must_use]
    pub fn with_thrown(mut self, thrown: Thrown) -> Self {
        self.thrown = Some(thrown);
        self
    }

    /// Override the instant, for replaying recorded events.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Override the producing thread's name, for replaying recorded events.
    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn thrown(&self) -> Option<&Thrown> {
        self.thrown.as_ref()
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }
}
