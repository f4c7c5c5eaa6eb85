//! Handler trait for log output destinations

use super::{error::Result, log_level::LogLevel, log_record::LogRecord};

/// A level-gated formatter and sink pair attached to a logger.
///
/// `publish` takes `&self`: level gating and formatting run concurrently,
/// only the final sink write is serialized by the implementation.
pub trait Handler: Send + Sync {
    fn name(&self) -> &str;

    /// Records strictly below this level are discarded.
    fn level(&self) -> LogLevel;

    fn is_loggable(&self, record: &LogRecord) -> bool {
        record.level() >= self.level()
    }

    fn publish(&self, record: &LogRecord) -> Result<()>;

    fn flush(&self);

    /// Release the sink. Later `publish` calls fail with `HandlerClosed`.
    fn close(&self);
}
