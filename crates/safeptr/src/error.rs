//! Buffer error types.

use std::error::Error;
use std::fmt;

use safeptr_ledger::{Identity, LedgerError};

/// Contract violations reported by [`SafePtr`](crate::SafePtr).
///
/// Both variants are returned in every build and every reporting mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SafePtrError {
    /// A checked accessor was given an index past the end.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the buffer.
        len: usize,
    },
    /// `free()` was called twice on the same allocation.
    DoubleFree {
        /// The ledger identity, when the buffer is tracked.
        identity: Option<Identity>,
    },
}

impl fmt::Display for SafePtrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(
                    f,
                    "tried to access SafePtr element out of range: index {index}, len {len}"
                )
            }
            Self::DoubleFree { identity: Some(id) } => {
                write!(
                    f,
                    "it was tried to free the same memory pointer twice (identity {id})"
                )
            }
            Self::DoubleFree { identity: None } => {
                write!(f, "it was tried to free the same memory pointer twice")
            }
        }
    }
}

impl Error for SafePtrError {}

impl From<LedgerError> for SafePtrError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DoubleFree { identity } => Self::DoubleFree {
                identity: Some(identity),
            },
        }
    }
}
