//! Non-fatal misuse diagnostics.

use std::error::Error;
use std::fmt;

use crate::identity::Identity;

/// The class of misuse a [`Warning`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// An accessor ran on an identity already marked deleted.
    UseAfterFree,
    /// The last holder of an identity went away without `free()`.
    Leak,
    /// A reference count was about to drop below zero, or the identity was
    /// no longer in the ledger.
    RefCountUnderflow,
}

impl WarningKind {
    /// Human-readable description, stable across releases so logs stay
    /// greppable.
    pub fn message(self) -> &'static str {
        match self {
            Self::UseAfterFree => "Tried to access data after free() was called.",
            Self::Leak => "Memory was leaked.",
            Self::RefCountUnderflow => "Reference count would drop below zero.",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A reportable, non-fatal misuse of a tracked buffer.
///
/// Handed to the registry's [`Reporter`](crate::Reporter). In raise mode
/// this exact value is the panic payload, so tests can downcast to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// What went wrong.
    pub kind: WarningKind,
    /// The identity involved.
    pub identity: Identity,
    /// Name of the registry that detected it (the element type for global
    /// registries).
    pub registry: &'static str,
}

impl Warning {
    /// Create a new warning.
    pub fn new(kind: WarningKind, identity: Identity, registry: &'static str) -> Self {
        Self {
            kind,
            identity,
            registry,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (identity {}, registry `{}`)",
            self.kind, self.identity, self.registry
        )
    }
}

impl Error for Warning {}
