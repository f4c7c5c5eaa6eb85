//! Bridge from the `log` crate facade to the global logger

use crate::core::{error::LoggerError, registry};
use log::{LevelFilter, Log, Metadata, Record};

/// Forwards `log` records to the global logger, unifying their level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBridge;

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        registry::global().is_enabled(metadata.level())
    }

    fn log(&self, record: &Record<'_>) {
        let logger = registry::global();
        if logger.is_enabled(record.level()) {
            logger.log(record.level(), record.args().to_string());
        }
    }

    fn flush(&self) {
        registry::global().flush();
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Install [`LogBridge`] as the `log` crate's logger with max level TRACE.
///
/// # Errors
///
/// Returns [`LoggerError::BridgeAlreadySet`] if another `log` implementation
/// is already installed
pub fn init_log_bridge() -> Result<(), LoggerError> {
    log::set_logger(&BRIDGE).map_err(|_| LoggerError::BridgeAlreadySet)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
