//! Benchmark fixtures for SafePtr.
//!
//! - [`BUFFER_LENS`]: element counts swept by the access benchmarks
//! - [`bench_registry`]: a private registry so benchmark traffic never
//!   touches the global ledgers
//! - [`ramp`]: deterministic buffer contents

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use safeptr::{Registry, RegistryConfig, ReportMode};

/// Buffer lengths used by the sweep benchmarks.
pub const BUFFER_LENS: [usize; 3] = [16, 1024, 65_536];

/// A registry that prints warnings, so a benchmark bug shows up in the log
/// instead of aborting the run.
pub fn bench_registry(name: &'static str) -> Arc<Registry> {
    Arc::new(Registry::new(
        RegistryConfig::named(name).with_report(ReportMode::Print),
    ))
}

/// `len` values `0.0, 1.0, 2.0, ...`.
pub fn ramp(len: usize) -> Vec<f32> {
    (0..len).map(|i| i as f32).collect()
}
