//! Internal failure reporting
//!
//! Logging calls never surface errors to the application. Failures that
//! happen inside the pipeline are reported here instead: formatting problems
//! go through the global logger at ERROR, sink problems go straight to stderr.

use std::cell::Cell;
use std::io::Write;

thread_local! {
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

/// Resets the re-entrancy flag even if dispatch unwinds.
struct ReportGuard;

impl Drop for ReportGuard {
    fn drop(&mut self) {
        REPORTING.with(|flag| flag.set(false));
    }
}

/// Report a pipeline failure through the global logger at ERROR.
///
/// A failure raised while such a report is being dispatched on the same
/// thread is written once to stderr instead of being logged again.
pub(crate) fn report_error(message: &str) {
    if REPORTING.with(|flag| flag.replace(true)) {
        report_to_stderr("LOGGER ERROR", message);
        return;
    }
    let _guard = ReportGuard;
    crate::core::registry::global().error(message);
}

/// Best-effort line on stderr; failures are ignored.
pub(crate) fn report_to_stderr(tag: &str, message: &str) {
    let _ = writeln!(std::io::stderr().lock(), "[{}] {}", tag, message);
}
