//! Pluggable warning sinks.
//!
//! A registry never decides on its own what a warning does to the program.
//! It hands every [`Warning`] to one [`Reporter`], chosen by
//! [`ReportMode`](crate::ReportMode) or injected directly. Reporters are
//! always invoked with the ledger lock released, so a reporter may panic.

use std::fmt;
use std::io::{self, IsTerminal};
use std::panic;
use std::thread;

use crate::warning::Warning;

/// Prefix of every line printed by [`StderrReporter`].
pub const WARNING_PREFIX: &str = "SafePtr warning: ";

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Sink for non-fatal misuse diagnostics.
pub trait Reporter: Send + Sync + fmt::Debug {
    /// Surface one warning.
    fn report(&self, warning: &Warning);
}

/// Prints warnings to stderr and lets execution continue.
///
/// The prefix is colored yellow when enabled, which by default means stderr
/// is a terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StderrReporter {
    color: bool,
}

impl StderrReporter {
    /// Color output only when stderr is attached to a terminal.
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Never color output.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Always color output.
    pub fn colored() -> Self {
        Self { color: true }
    }

    /// The exact line this reporter prints for `warning`, without newline.
    pub fn render(&self, warning: &Warning) -> String {
        if self.color {
            format!("{YELLOW}{WARNING_PREFIX}{RESET}{warning}")
        } else {
            format!("{WARNING_PREFIX}{warning}")
        }
    }
}

impl Default for StderrReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for StderrReporter {
    fn report(&self, warning: &Warning) {
        eprintln!("{}", self.render(warning));
    }
}

/// Raises warnings as a panic carrying the [`Warning`] itself.
///
/// Catch with [`std::panic::catch_unwind`] and downcast the payload to
/// `Warning` to tell a warning apart from any other panic. If the thread is
/// already unwinding (a leak detected while dropping during another panic),
/// the warning is printed instead, since a second panic would abort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RaiseReporter;

impl Reporter for RaiseReporter {
    fn report(&self, warning: &Warning) {
        if thread::panicking() {
            StderrReporter::new().report(warning);
            return;
        }
        panic::panic_any(warning.clone());
    }
}

/// Emits warnings as `tracing` events at `WARN` level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, warning: &Warning) {
        tracing::warn!(
            kind = ?warning.kind,
            identity = warning.identity.get(),
            registry = warning.registry,
            "{}",
            warning.kind.message()
        );
    }
}
