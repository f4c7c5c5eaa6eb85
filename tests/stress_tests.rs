//! Stress tests for concurrent registry access and concurrent writes
//!
//! These tests verify:
//! - Concurrent first access to a registry yields one shared logger
//! - The first-insertion installer runs exactly once under contention
//! - Records written from many threads never interleave within a line

use rust_global_logger::handlers::{FileHandler, FileTarget};
use rust_global_logger::{LogLevel, LoggerConfiguration, LoggerRegistry, GLOBAL_LOGGER_NAME};
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

#[test]
fn test_concurrent_get_logger_shares_one_instance() {
    const THREADS: usize = 32;

    for _ in 0..20 {
        let installs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&installs);
        let registry = Arc::new(LoggerRegistry::with_installer(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.get_logger(&format!("worker-{}", i))
                })
            })
            .collect();

        let loggers: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect();

        let first = &loggers[0];
        assert!(loggers.iter().all(|l| Arc::ptr_eq(l, first)));
        assert_eq!(first.name(), GLOBAL_LOGGER_NAME);
        assert_eq!(installs.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }
}

#[test]
fn test_concurrent_writes_do_not_interleave() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pattern = temp_dir.path().join("stress%u.log").to_string_lossy().into_owned();

    let registry = LoggerRegistry::with_installer(|_| {});
    let logger = registry.get_logger("stress");
    let config = LoggerConfiguration::new().bare().print_thread_name(true);
    let handler = FileHandler::new(&config, FileTarget::new(pattern)).expect("Failed to create handler");
    let path = handler.path().expect("handler is open");
    logger.configure(LogLevel::Trace, vec![Arc::new(handler)]);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::Builder::new()
                .name(format!("writer-{}", t))
                .spawn(move || {
                    for i in 0..PER_THREAD {
                        logger.info(format!("message {} part one\nmessage {} part two", i, i));
                    }
                })
                .expect("Failed to spawn")
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }
    logger.flush();

    let content = fs::read_to_string(&path).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD * 2);

    let mut seen = HashSet::new();
    for pair in lines.chunks(2) {
        let (thread_one, rest_one) = pair[0].split_once("] ").expect("prefixed line");
        let (thread_two, rest_two) = pair[1].split_once("] ").expect("prefixed line");
        assert_eq!(thread_one, thread_two);

        let index = rest_one
            .strip_prefix("message ")
            .and_then(|r| r.strip_suffix(" part one"))
            .expect("first line of a record");
        assert_eq!(rest_two, format!("message {} part two", index));
        assert!(seen.insert(format!("{}{}", thread_one, index)));
    }
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}

#[test]
fn test_concurrent_level_changes_are_safe() {
    let registry = Arc::new(LoggerRegistry::with_installer(|_| {}));
    let logger = registry.get_logger("levels");

    let setter = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..1000 {
                logger.set_min_level(LogLevel::ALL[i % LogLevel::ALL.len()]);
            }
        })
    };
    let reader = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for _ in 0..1000 {
                logger.debug("no handlers attached");
                let _ = logger.is_info_enabled();
            }
        })
    };

    setter.join().expect("setter panicked");
    reader.join().expect("reader panicked");
    assert!(!logger.has_handlers());
}
