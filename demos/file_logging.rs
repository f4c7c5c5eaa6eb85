//! File logging example
//!
//! Demonstrates logging to both console and a size-rotated file, routing
//! `log` crate records and uncaught panics through the same handlers.
//!
//! Run with: cargo run --example file_logging

use rust_global_logger::global as log;
use rust_global_logger::handlers::{ConsoleHandler, FileHandler, FileTarget};
use rust_global_logger::{init_log_bridge, LogLevel, LoggerConfiguration, Result};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Global Logger - File Logging Example ===\n");

    log::create_default_log_folder()?;

    let config = LoggerConfiguration::new().level(LogLevel::Debug);
    let file = FileHandler::new(
        &config,
        FileTarget::new("./logs/application.%g.log")
            .with_limit(64 * 1024)
            .with_count(4)
            .with_append(true),
    )?;
    let file_path = file.path();

    log::configure_with_handlers(
        LogLevel::Trace,
        vec![
            Arc::new(ConsoleHandler::new(&config.clone().level(LogLevel::Info))),
            Arc::new(file),
        ],
    );
    init_log_bridge()?;

    println!("1. Logging to both console and file:");
    log::info("Application started");
    log::debug("Loading configuration... (file only)");
    log::warn("Using default settings for some options");
    ::log::info!("Records from the log crate use the same handlers");

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        log::info(format!("Processing item {}/5", i));
        if i == 3 {
            log::warn("Item 3 took longer than expected");
        }
    }

    println!("\n3. A panicking worker thread:");
    let worker = std::thread::Builder::new()
        .name("worker".to_string())
        .spawn(|| panic!("worker lost its connection"))?;
    let _ = worker.join();

    log::info("All operations completed");
    log::global().flush();

    println!("\n=== Example completed successfully! ===");
    if let Some(path) = file_path {
        println!("Check '{}' for the full log output", path.display());
    }

    Ok(())
}
