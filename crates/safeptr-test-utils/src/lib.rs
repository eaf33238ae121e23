//! Test utilities for SafePtr development.
//!
//! Provides a [`CollectingReporter`] that records warnings instead of
//! printing them, [`expect_warning`] / [`assert_warns!`] for asserting that
//! one call raised a warning under [`ReportMode::Raise`], and registry
//! fixtures in [`fixtures`].
//!
//! [`ReportMode::Raise`]: safeptr_ledger::ReportMode::Raise

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use safeptr_ledger::{Reporter, Warning, WarningKind};

pub use fixtures::{collecting_registry, raising_registry};

/// Reporter that stores every warning for later inspection.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    warnings: Mutex<Vec<Warning>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All warnings reported so far, oldest first.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.lock().unwrap().clone()
    }

    /// Kinds of all warnings reported so far, oldest first.
    pub fn kinds(&self) -> Vec<WarningKind> {
        self.warnings.lock().unwrap().iter().map(|w| w.kind).collect()
    }

    /// Number of warnings of `kind`.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.kind == kind)
            .count()
    }

    /// Total number of warnings.
    pub fn len(&self) -> usize {
        self.warnings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.warnings.lock().unwrap())
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, warning: &Warning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }
}

/// Run `f` and return the [`Warning`] it raised.
///
/// Intended for registries in raise mode. Panics if `f` completes normally;
/// any panic that is not a warning is resumed unchanged.
pub fn expect_warning<R>(f: impl FnOnce() -> R) -> Warning {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected a SafePtr warning, but the call completed normally"),
        Err(payload) => match payload.downcast::<Warning>() {
            Ok(warning) => *warning,
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Assert that an expression raises a warning, optionally of a given kind.
///
/// ```ignore
/// assert_warns!(p.len());
/// assert_warns!(WarningKind::UseAfterFree, p[0]);
/// ```
#[macro_export]
macro_rules! assert_warns {
    ($kind:expr, $e:expr) => {{
        let warning = $crate::expect_warning(|| $e);
        assert_eq!(
            warning.kind,
            $kind,
            "`{}` raised the wrong warning",
            stringify!($e)
        );
        warning
    }};
    ($e:expr) => {
        $crate::expect_warning(|| $e)
    };
}
