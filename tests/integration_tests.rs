//! Integration tests for the global logger
//!
//! These tests verify:
//! - Console routing of alert levels to the error stream
//! - Level gating at the logger and at the handler
//! - File output with rotation
//! - Handler failure isolation
//! - Call-site resolution from outside the crate

use parking_lot::Mutex;
use rust_global_logger::handlers::{ConsoleHandler, FileHandler, FileTarget};
use rust_global_logger::{
    Handler, LogLevel, LogRecord, Logger, LoggerConfiguration, LoggerError, LoggerRegistry,
    NativeLevel, Result, Thrown, LINE_SEPARATOR,
};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn console(config: &LoggerConfiguration) -> (Arc<ConsoleHandler>, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let handler = ConsoleHandler::new(config)
        .with_streams(Box::new(out.clone()), Box::new(err.clone()));
    (Arc::new(handler), out, err)
}

#[test]
fn test_console_routes_warn_to_error_stream() {
    let registry = LoggerRegistry::with_installer(|_| {});
    let logger = registry.get_logger("app");

    let config = LoggerConfiguration::new().bare().print_level(true);
    let (handler, out, err) = console(&config);
    logger.configure(LogLevel::Trace, vec![handler]);

    logger.info("ready");
    logger.warn("disk low");
    logger.log(NativeLevel::Severe, "failed");

    assert_eq!(out.contents(), format!(" [INFO ] ready{}", LINE_SEPARATOR));
    assert_eq!(
        err.contents(),
        format!(" [WARN ] disk low{sep} [ERROR] failed{sep}", sep = LINE_SEPARATOR)
    );
}

#[test]
fn test_warn_only_touches_error_stream() {
    let logger = Logger::new("warn");
    let (handler, out, err) = console(&LoggerConfiguration::new().bare().print_level(true));
    logger.configure(LogLevel::Trace, vec![handler]);

    logger.warn("disk low");

    assert!(out.contents().is_empty());
    assert_eq!(err.contents(), format!(" [WARN ] disk low{}", LINE_SEPARATOR));
}

#[test]
fn test_handler_level_discards_lower_records() {
    let logger = Logger::new("gating");
    let config = LoggerConfiguration::new().level(LogLevel::Info);
    let (handler, out, err) = console(&config);
    logger.configure(LogLevel::Trace, vec![handler]);

    logger.trace("too quiet");
    logger.debug("still too quiet");

    assert!(out.contents().is_empty());
    assert!(err.contents().is_empty());
    assert_eq!(logger.metrics().total_logged(), 2);
}

#[test]
fn test_logger_level_filters_before_handlers() {
    let logger = Logger::new("filtering");
    let (handler, out, _err) = console(&LoggerConfiguration::new().bare());
    logger.configure(LogLevel::Warn, vec![handler]);

    logger.info("skipped");
    logger.log(log::Level::Info, "skipped too");

    assert!(out.contents().is_empty());
    assert_eq!(logger.metrics().filtered_count(), 2);
}

#[test]
fn test_thrown_error_chain_in_output() {
    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct Reset;

    #[derive(Debug, thiserror::Error)]
    #[error("upload failed")]
    struct Upload(#[source] Reset);

    let logger = Logger::new("errors");
    let (handler, _out, err) = console(&LoggerConfiguration::new().bare().print_level(true));
    logger.configure(LogLevel::Trace, vec![handler]);

    logger.error_with_error("transfer aborted", Thrown::new(Upload(Reset)));

    let lines: Vec<String> = err.contents().lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            " [ERROR] transfer aborted",
            " [ERROR] upload failed",
            " [ERROR] Caused by: connection reset",
        ]
    );
}

#[test]
fn test_file_handler_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pattern = temp_dir.path().join("app.%g.log").to_string_lossy().into_owned();

    let config = LoggerConfiguration::new().print_caller(false);
    let handler = FileHandler::new(&config, FileTarget::new(pattern).with_limit(200).with_count(3))
        .expect("Failed to create handler");
    let path = handler.path().expect("handler is open");

    let logger = Logger::new("file");
    logger.configure(LogLevel::Trace, vec![Arc::new(handler)]);

    logger.info("first entry");
    logger.debug("second entry");
    logger.flush();

    let content = fs::read_to_string(&path).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(" [INFO ] ["));
    assert!(lines[0].ends_with("] first entry"));
    assert!(lines[1].ends_with("] second entry"));

    for i in 0..20 {
        logger.info(format!("filler {}", i));
    }
    assert!(temp_dir.path().join("app.1.log").exists());
    assert!(!temp_dir.path().join("app.3.log").exists());
}

#[test]
fn test_reconfigure_closes_file_handler() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pattern = temp_dir.path().join("closing%u.log").to_string_lossy().into_owned();

    let handler = Arc::new(
        FileHandler::new(&LoggerConfiguration::new(), FileTarget::new(pattern))
            .expect("Failed to create handler"),
    );
    let logger = Logger::new("closing");
    logger.configure(LogLevel::Trace, vec![handler.clone()]);
    logger.configure(LogLevel::Trace, Vec::new());

    assert!(handler.is_closed());
    assert!(matches!(
        handler.publish(&LogRecord::new(LogLevel::Error, "late", "GLOBAL")),
        Err(LoggerError::HandlerClosed(_))
    ));
}

struct BrokenHandler;

impl Handler for BrokenHandler {
    fn name(&self) -> &str {
        "broken"
    }

    fn level(&self) -> LogLevel {
        LogLevel::Trace
    }

    fn publish(&self, _record: &LogRecord) -> Result<()> {
        Err(LoggerError::writer("sink unavailable"))
    }

    fn flush(&self) {}

    fn close(&self) {}
}

#[test]
fn test_failing_handler_does_not_block_others() {
    let logger = Logger::new("isolation");
    let (handler, out, _err) = console(&LoggerConfiguration::new().bare());
    logger.configure(LogLevel::Trace, vec![Arc::new(BrokenHandler), handler]);

    logger.info("delivered");

    assert_eq!(out.contents(), format!("delivered{}", LINE_SEPARATOR));
    assert_eq!(logger.dropped_count(), 1);
    assert_eq!(logger.metrics().handler_failures(), 1);
}

#[test]
fn test_caller_field_skips_logging_frames() {
    let logger = Logger::new("caller");
    let config = LoggerConfiguration::new().bare().print_caller(true);
    let (handler, out, _err) = console(&config);
    logger.configure(LogLevel::Trace, vec![handler]);

    logger.info("located");

    let line = out.contents();
    assert!(line.ends_with(&format!("located{}", LINE_SEPARATOR)));
    // Symbolication may be unavailable; when it works the frame must be ours
    assert!(!line.contains("rust_global_logger"), "caller was {}", line);
    if line.starts_with(" [") {
        assert!(line.contains("integration_tests"), "caller was {}", line);
    }
}
