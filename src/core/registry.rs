//! Process-wide logger registry and the uncaught panic hook

use super::logger::{Logger, GLOBAL_LOGGER_NAME};
use super::log_record::Thrown;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::panic::{self, PanicHookInfo};
use std::sync::{Arc, Once, OnceLock};

type Installer = Box<dyn Fn(&Arc<Logger>) + Send + Sync>;

/// Payload and location of a panic that reached the hook.
#[derive(Debug, thiserror::Error)]
#[error("{message} at {location}")]
pub struct PanicError {
    pub message: String,
    pub location: String,
}

/// Name to logger cache with at most one instance per name.
///
/// Every requested name is canonicalized to [`GLOBAL_LOGGER_NAME`], so a
/// registry holds a single logger. The first insertion runs the installer
/// exactly once; the default installer routes uncaught panics through that
/// logger.
pub struct LoggerRegistry {
    loggers: DashMap<String, Arc<Logger>>,
    installed: Once,
    installer: Installer,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::with_installer(install_panic_hook)
    }

    /// Registry running `installer` instead of the panic hook on first insertion.
    pub fn with_installer<F>(installer: F) -> Self
    where
        F: Fn(&Arc<Logger>) + Send + Sync + 'static,
    {
        Self {
            loggers: DashMap::new(),
            installed: Once::new(),
            installer: Box::new(installer),
        }
    }

    /// Return the shared logger for `name`, creating it on first access.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        let key = canonical_name(name);

        if let Some(existing) = self.loggers.get(key) {
            return Arc::clone(existing.value());
        }

        let candidate = Arc::new(Logger::new(key));
        let (logger, inserted) = match self.loggers.entry(key.to_string()) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => (Arc::clone(entry.insert(candidate).value()), true),
        };

        if inserted {
            self.installed.call_once(|| (self.installer)(&logger));
        }
        logger
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.loggers.len())
            .field("installed", &self.installed.is_completed())
            .finish()
    }
}

fn canonical_name(_name: &str) -> &'static str {
    GLOBAL_LOGGER_NAME
}

static GLOBAL_REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

/// The lazily initialized process-wide registry.
pub fn registry() -> &'static LoggerRegistry {
    GLOBAL_REGISTRY.get_or_init(LoggerRegistry::new)
}

/// The process-wide logger.
pub fn global() -> Arc<Logger> {
    registry().get_logger(GLOBAL_LOGGER_NAME)
}

/// Route uncaught panics through `logger` at ERROR.
///
/// Falls back to the previously installed hook while the logger has no
/// handlers, or when the panic was raised by a handler during dispatch.
pub fn install_panic_hook(logger: &Arc<Logger>) {
    let logger = Arc::clone(logger);
    let previous = panic::take_hook();

    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        if Logger::is_dispatching() || !logger.has_handlers() {
            previous(info);
            return;
        }

        let payload = info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "<unknown>".to_string());

        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("<unnamed>");

        logger.error_with_error(
            format!("Uncaught panic on thread {}", thread_name),
            Thrown::with_backtrace(PanicError { message, location }),
        );
        logger.flush();
    }));
}
