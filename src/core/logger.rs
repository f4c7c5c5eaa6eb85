//! Main logger implementation

use super::{
    handler::Handler,
    log_level::{LogLevel, UnifyLevel},
    log_record::{LogRecord, Thrown},
    metrics::LoggerMetrics,
    report::report_to_stderr,
};
use parking_lot::RwLock;
use std::cell::Cell;
use std::sync::Arc;

/// Key every logger name is canonicalized to by the registry.
pub const GLOBAL_LOGGER_NAME: &str = "GLOBAL";

thread_local! {
    static DISPATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Marks the current thread as inside handler dispatch for its lifetime.
struct DispatchGuard;

impl DispatchGuard {
    fn enter() -> Self {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
        DispatchGuard
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Synchronous logger routing records to its handlers on the calling thread.
///
/// All methods take `&self`; a logger is shared as `Arc<Logger>` through the
/// [`LoggerRegistry`](crate::LoggerRegistry).
pub struct Logger {
    name: String,
    min_level: RwLock<LogLevel>,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    /// Metrics for observability (dropped count, total logged, etc.)
    metrics: LoggerMetrics,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: RwLock::new(LogLevel::Info),
            handlers: RwLock::new(Vec::new()),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the current thread is already dispatching a record.
    pub(crate) fn is_dispatching() -> bool {
        DISPATCH_DEPTH.with(|depth| depth.get() > 0)
    }

    pub fn add_handler<H: Handler + 'static>(&self, handler: H) {
        self.add_shared_handler(Arc::new(handler));
    }

    pub fn add_shared_handler(&self, handler: Arc<dyn Handler>) {
        self.handlers.write().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read_recursive().len()
    }

    pub fn has_handlers(&self) -> bool {
        self.handler_count() > 0
    }

    /// Replace the whole handler set and the minimum level.
    ///
    /// Previously attached handlers are closed.
    pub fn configure(&self, level: LogLevel, handlers: Vec<Arc<dyn Handler>>) {
        let previous = std::mem::replace(&mut *self.handlers.write(), handlers);
        self.set_min_level(level);

        for handler in previous {
            handler.close();
        }
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Compare `level` against the logger's minimum without building a record.
    #[inline]
    pub fn is_enabled(&self, level: impl UnifyLevel) -> bool {
        level.unify() >= self.min_level()
    }

    pub fn log(&self, level: impl UnifyLevel, message: impl Into<String>) {
        let level = level.unify();
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let record = LogRecord::new(level, message, self.name.as_str());
        self.dispatch(&record);
    }

    pub fn log_with_error(&self, level: impl UnifyLevel, message: impl Into<String>, thrown: Thrown) {
        let level = level.unify();
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let record = LogRecord::new(level, message, self.name.as_str()).with_thrown(thrown);
        self.dispatch(&record);
    }

    /// Route an already built record, applying the logger's minimum level.
    pub fn log_record(&self, record: &LogRecord) {
        if !self.is_enabled(record.level()) {
            self.metrics.record_filtered();
            return;
        }
        self.dispatch(record);
    }

    /// Hand the record to every handler with per-handler panic isolation.
    ///
    /// A failing or panicking handler is reported on stderr and never keeps
    /// the other handlers from receiving the record.
    fn dispatch(&self, record: &LogRecord) {
        let _guard = DispatchGuard::enter();
        // Formatting may log its own failures through this logger on the same thread
        let handlers = self.handlers.read_recursive();
        let mut has_error = false;

        for handler in handlers.iter() {
            let publish_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.publish(record)
            }));

            match publish_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    report_to_stderr(
                        "LOGGER ERROR",
                        &format!("Handler '{}' failed: {}", handler.name(), e),
                    );
                    self.metrics.record_handler_failure();
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    report_to_stderr(
                        "LOGGER CRITICAL",
                        &format!(
                            "Handler '{}' panicked: {}. Other handlers continue to function.",
                            handler.name(),
                            panic_msg
                        ),
                    );
                    self.metrics.record_handler_failure();
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
    }

    /// Get the number of records at least one handler failed to write
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) {
        for handler in self.handlers.read().iter() {
            handler.flush();
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn trace_with_error(&self, message: impl Into<String>, thrown: Thrown) {
        self.log_with_error(LogLevel::Trace, message, thrown);
    }

    pub fn debug_with_error(&self, message: impl Into<String>, thrown: Thrown) {
        self.log_with_error(LogLevel::Debug, message, thrown);
    }

    pub fn info_with_error(&self, message: impl Into<String>, thrown: Thrown) {
        self.log_with_error(LogLevel::Info, message, thrown);
    }

    pub fn warn_with_error(&self, message: impl Into<String>, thrown: Thrown) {
        self.log_with_error(LogLevel::Warn, message, thrown);
    }

    pub fn error_with_error(&self, message: impl Into<String>, thrown: Thrown) {
        self.log_with_error(LogLevel::Error, message, thrown);
    }

    pub fn is_trace_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Trace)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Debug)
    }

    pub fn is_info_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Info)
    }

    pub fn is_warn_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Warn)
    }

    pub fn is_error_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Error)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(GLOBAL_LOGGER_NAME)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}
