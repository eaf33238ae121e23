//! Ledger error types.

use std::error::Error;
use std::fmt;

use crate::identity::Identity;

/// Hard failures raised by the ledger.
///
/// Unlike [`Warning`](crate::Warning)s these are returned to the caller in
/// every reporting mode: continuing past them would mean releasing the same
/// memory twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// `free()` was called on an identity that is already marked deleted.
    DoubleFree {
        /// The identity that was freed twice.
        identity: Identity,
    },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleFree { identity } => {
                write!(
                    f,
                    "it was tried to free the same memory pointer twice (identity {identity})"
                )
            }
        }
    }
}

impl Error for LedgerError {}
