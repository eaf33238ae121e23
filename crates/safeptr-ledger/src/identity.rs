//! Allocation identities.

use std::fmt;

/// Key under which a registry records one allocation.
///
/// Assigned when a buffer is constructed or copied, never when it is moved.
/// Identities are unique among the live entries of one registry; after the
/// counter wraps they may be reused once their previous holder is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub u64);

impl Identity {
    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Identity {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
