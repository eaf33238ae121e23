//! Registry configuration parameters.

use std::sync::Arc;

use crate::report::{RaiseReporter, Reporter, StderrReporter, TracingReporter};

/// How a registry surfaces [`Warning`](crate::Warning)s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportMode {
    /// Print to stderr and continue. Meant for human-observed debug runs.
    Print,
    /// Raise the warning as a typed panic payload so a test can assert that
    /// a specific call warned.
    Raise,
    /// Emit a `tracing` event at `WARN` level and continue.
    Log,
}

impl ReportMode {
    /// Build the sink implementing this mode.
    pub fn reporter(self) -> Arc<dyn Reporter> {
        match self {
            Self::Print => Arc::new(StderrReporter::new()),
            Self::Raise => Arc::new(RaiseReporter),
            Self::Log => Arc::new(TracingReporter),
        }
    }
}

impl Default for ReportMode {
    /// `Raise` when the `test-mode` feature is enabled, `Print` otherwise.
    fn default() -> Self {
        if cfg!(feature = "test-mode") {
            Self::Raise
        } else {
            Self::Print
        }
    }
}

/// Configuration for a [`Registry`](crate::Registry).
///
/// All values are read once at construction.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Name used in diagnostics. Global registries use the element type name.
    pub name: &'static str,

    /// How warnings are surfaced. The sink can be replaced later with
    /// [`Registry::set_reporter`](crate::Registry::set_reporter).
    pub report: ReportMode,

    /// Starting value of the identity counter. The first identity handed out
    /// is `identity_seed + 1`.
    ///
    /// Default: 0. Seeding close to `u64::MAX` exercises wraparound.
    pub identity_seed: u64,
}

impl RegistryConfig {
    /// Default registry name.
    pub const DEFAULT_NAME: &'static str = "SafePtr";

    /// Default identity counter seed.
    pub const DEFAULT_IDENTITY_SEED: u64 = 0;

    /// Create a config with the given name and default values otherwise.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            report: ReportMode::default(),
            identity_seed: Self::DEFAULT_IDENTITY_SEED,
        }
    }

    /// Replace the reporting mode.
    pub fn with_report(mut self, report: ReportMode) -> Self {
        self.report = report;
        self
    }

    /// Replace the identity counter seed.
    pub fn with_identity_seed(mut self, seed: u64) -> Self {
        self.identity_seed = seed;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::named(Self::DEFAULT_NAME)
    }
}
