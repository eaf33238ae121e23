//! Registry fixtures.
//!
//! Tests build their own registries instead of using the global ones so
//! that warnings, counts and reporting modes never leak between tests
//! running in parallel.

use std::sync::Arc;

use safeptr_ledger::{Registry, RegistryConfig, ReportMode};

use crate::CollectingReporter;

/// A registry that raises every warning as a typed panic.
pub fn raising_registry(name: &'static str) -> Arc<Registry> {
    Arc::new(Registry::new(
        RegistryConfig::named(name).with_report(ReportMode::Raise),
    ))
}

/// A registry whose warnings are recorded by the returned reporter.
pub fn collecting_registry(name: &'static str) -> (Arc<Registry>, Arc<CollectingReporter>) {
    let sink = Arc::new(CollectingReporter::new());
    let registry = Arc::new(Registry::with_reporter(name, sink.clone()));
    (registry, sink)
}
