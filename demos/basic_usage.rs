//! Basic logger usage example
//!
//! Demonstrates the global logger with a console handler, level filtering,
//! multi-line messages and method tracing.
//!
//! Run with: cargo run --example basic_usage

use rust_global_logger::global as log;
use rust_global_logger::{info, warn, LogLevel, LoggerConfiguration, NativeLevel, Thrown};

#[derive(Debug, thiserror::Error)]
#[error("configuration file missing")]
struct MissingConfig;

fn checksum(data: &[u8]) -> u32 {
    log::entry_with(&[&data.len()]);
    let sum = data.iter().map(|&b| u32::from(b)).sum();
    log::exit_with(&sum);
    sum
}

fn main() {
    println!("=== Rust Global Logger - Basic Usage Example ===\n");

    // Console handler, everything down to TRACE
    log::configure_default();

    println!("1. Logging at different levels:");
    log::trace("This is a trace message");
    log::debug("This is a debug message");
    log::info("This is an info message");
    log::warn("This is a warning message");
    log::error("This is an error message");
    log::log(NativeLevel::Config, "Backend levels are unified onto the same scale");

    println!("\n2. Macros and multi-line messages:");
    info!("Processing {} items", 100);
    warn!("Retry attempt {} of {}\nnext attempt in {}s", 3, 5, 10);
    log::error_with_error("Startup degraded", Thrown::new(MissingConfig));

    println!("\n3. Method tracing:");
    checksum(b"hello");

    println!("\n4. Minimum level INFO without thread names:");
    log::configure(
        &LoggerConfiguration::new()
            .level(LogLevel::Info)
            .print_thread_name(false),
    );
    log::debug("Debug message (hidden)");
    log::info("Info message (visible)");

    println!("\n=== Example completed successfully! ===");
}
