//! The logging capability [`crate::Outcome::log`] dispatches to.
//!
//! The library never decides what a fatal or panic write does to the process;
//! that is up to the [`Logger`] implementation. [`TracingLogger`] is the
//! reference implementation: it records through `tracing`, then exits or
//! panics as the level demands.

use std::fmt::Display;

/// Destination for outcomes that carry a condition.
///
/// Each operation receives the items to record, usually a single
/// [`crate::Outcome`].
pub trait Logger {
    /// Records a fatal condition. Expected to terminate the process.
    fn fatal(&mut self, items: &[&dyn Display]);

    /// Records a panic condition. Expected to panic afterwards.
    fn panic(&mut self, items: &[&dyn Display]);

    /// Records an error condition without affecting control flow.
    fn print(&mut self, items: &[&dyn Display]);
}

/// Renders items separated by single spaces.
pub fn render(items: &[&dyn Display]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`Logger`] emitting `tracing` events at `ERROR` level.
///
/// - `print` records the event.
/// - `panic` records the event, then panics with the rendered items.
/// - `fatal` records the event, then exits with [`TracingLogger::exit_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingLogger {
    /// Process exit code used by [`Logger::fatal`].
    pub exit_code: i32,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self { exit_code: 1 }
    }
}

impl Logger for TracingLogger {
    fn fatal(&mut self, items: &[&dyn Display]) {
        let message = render(items);
        tracing::error!(severity = "FATAL", exit_code = self.exit_code, "{message}");
        std::process::exit(self.exit_code);
    }

    fn panic(&mut self, items: &[&dyn Display]) {
        let message = render(items);
        tracing::error!(severity = "PANIC", "{message}");
        panic!("{message}");
    }

    fn print(&mut self, items: &[&dyn Display]) {
        let message = render(items);
        tracing::error!(severity = "ERROR", "{message}");
    }
}
