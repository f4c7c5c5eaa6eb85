//! Criterion benchmarks for rust_global_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_global_logger::prelude::*;
use std::io;
use std::sync::Arc;

fn sink_handler(config: &LoggerConfiguration) -> Arc<dyn Handler> {
    Arc::new(ConsoleHandler::new(config).with_streams(Box::new(io::sink()), Box::new(io::sink())))
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::new(LogLevel::Info, "Benchmark message", "GLOBAL");
    let multi_line = LogRecord::new(LogLevel::Info, "first\nsecond\nthird\nfourth", "GLOBAL");

    let without_caller = DefaultFormatter::new(&LoggerConfiguration::new().print_caller(false));
    group.bench_function("prefix_without_caller", |b| {
        b.iter(|| black_box(without_caller.format(black_box(&record))));
    });

    group.bench_function("multi_line_without_caller", |b| {
        b.iter(|| black_box(without_caller.format(black_box(&multi_line))));
    });

    let with_caller = DefaultFormatter::new(&LoggerConfiguration::new());
    group.bench_function("prefix_with_caller", |b| {
        b.iter(|| black_box(with_caller.format(black_box(&record))));
    });

    group.finish();
}

// ============================================================================
// Caller Resolution Benchmarks
// ============================================================================

fn bench_caller_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("caller_resolution");

    let resolver = CallerResolver::new(&LoggerConfiguration::new());
    group.bench_function("live_stack", |b| {
        b.iter(|| black_box(resolver.resolve()));
    });

    group.bench_function("parse_symbol", |b| {
        b.iter(|| {
            black_box(CallSite::from_symbol(
                black_box("<app::jobs::Import as app::Task>::run"),
                Some(42),
            ))
        });
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::new("bench");
    logger.configure(
        LogLevel::Trace,
        vec![sink_handler(&LoggerConfiguration::new().print_caller(false))],
    );

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("native_level", |b| {
        b.iter(|| logger.log(NativeLevel::Fine, black_box("Fine message")));
    });

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::new("bench");
    logger.configure(LogLevel::Error, vec![sink_handler(&LoggerConfiguration::new())]);

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("Filtered message")));
    });

    group.bench_function("is_enabled", |b| {
        b.iter(|| black_box(logger.is_debug_enabled()));
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = Arc::new(Logger::new("bench"));
    logger.configure(
        LogLevel::Trace,
        vec![sink_handler(&LoggerConfiguration::new().print_caller(false))],
    );

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        std::thread::spawn(move || {
                            for i in 0..100 {
                                logger.info(format!("Message {}", i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_formatting,
    bench_caller_resolution,
    bench_dispatch,
    bench_level_filtering,
    bench_concurrent_logging,
);

criterion_main!(benches);
