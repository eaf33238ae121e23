//! Tracking modes.
//!
//! A [`SafePtr`](crate::SafePtr) is generic over how much bookkeeping it
//! does. [`Tracked`] keeps a [`Ticket`] into a [`Registry`] and reports
//! use-after-free, leaks and underflow. [`Untracked`] keeps a single freed
//! flag: no registry, no lock, only the always-on double-free check.
//!
//! [`DefaultTracking`] picks one per build: tracked under
//! `debug_assertions` or the `release-tracking` feature, untracked
//! otherwise.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use safeptr_ledger::{Identity, Registry};

use crate::error::SafePtrError;

mod sealed {
    pub trait Sealed {}
}

/// Bookkeeping strategy of a [`SafePtr`](crate::SafePtr).
///
/// Sealed: the buffer relies on the exact lifecycle contract below.
pub trait Tracking: sealed::Sealed + Sized + Send + Sync + 'static {
    /// Per-instance state.
    type Token: Send + Sync + fmt::Debug;

    /// Token for a buffer built from scratch.
    fn fresh<T: 'static>() -> Self::Token;

    /// Token for an allocation-less placeholder, already counted as freed.
    fn placeholder<T: 'static>() -> Self::Token;

    /// Token for an independent copy of the buffer holding `source`.
    fn copy_of(source: &Self::Token) -> Self::Token;

    /// Token for a second logical holder of the same allocation.
    fn share(token: &Self::Token) -> Self::Token;

    /// Report if the allocation was already freed.
    fn check_live(token: &Self::Token);

    /// Mark the allocation freed.
    fn free(token: &Self::Token) -> Result<(), SafePtrError>;

    /// Whether the allocation was freed. Never reports.
    fn is_freed(token: &Self::Token) -> bool;

    /// Drop one logical holder.
    fn release(token: &Self::Token);
}

/// Ledger-backed tracking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tracked;

/// Zero-overhead mode: only double-free is detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Untracked;

/// The mode used when none is named.
#[cfg(any(debug_assertions, feature = "release-tracking"))]
pub type DefaultTracking = Tracked;

/// The mode used when none is named.
#[cfg(not(any(debug_assertions, feature = "release-tracking")))]
pub type DefaultTracking = Untracked;

/// A tracked buffer's link into its registry.
#[derive(Debug)]
pub struct Ticket {
    registry: Arc<Registry>,
    identity: Identity,
}

impl Ticket {
    pub(crate) fn register(registry: &Arc<Registry>) -> Self {
        Self {
            identity: registry.register_new(),
            registry: Arc::clone(registry),
        }
    }

    pub(crate) fn register_placeholder(registry: &Arc<Registry>) -> Self {
        Self {
            identity: registry.register_placeholder(),
            registry: Arc::clone(registry),
        }
    }

    /// The registry this ticket is recorded in.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The ledger identity.
    pub fn identity(&self) -> Identity {
        self.identity
    }
}

impl sealed::Sealed for Tracked {}

impl Tracking for Tracked {
    type Token = Ticket;

    fn fresh<T: 'static>() -> Ticket {
        Ticket::register(&Registry::global::<T>())
    }

    fn placeholder<T: 'static>() -> Ticket {
        Ticket::register_placeholder(&Registry::global::<T>())
    }

    fn copy_of(source: &Ticket) -> Ticket {
        Ticket::register(&source.registry)
    }

    fn share(token: &Ticket) -> Ticket {
        token.registry.increment(token.identity);
        Ticket {
            registry: Arc::clone(&token.registry),
            identity: token.identity,
        }
    }

    fn check_live(token: &Ticket) {
        token.registry.check_live(token.identity);
    }

    fn free(token: &Ticket) -> Result<(), SafePtrError> {
        token.registry.mark_deleted(token.identity)?;
        Ok(())
    }

    fn is_freed(token: &Ticket) -> bool {
        token.registry.is_deleted(token.identity).unwrap_or(true)
    }

    fn release(token: &Ticket) {
        token.registry.decrement(token.identity);
    }
}

/// An untracked buffer's freed flag.
#[derive(Debug)]
pub struct FreedFlag(AtomicBool);

impl sealed::Sealed for Untracked {}

impl Tracking for Untracked {
    type Token = FreedFlag;

    fn fresh<T: 'static>() -> FreedFlag {
        FreedFlag(AtomicBool::new(false))
    }

    fn placeholder<T: 'static>() -> FreedFlag {
        FreedFlag(AtomicBool::new(true))
    }

    fn copy_of(_source: &FreedFlag) -> FreedFlag {
        FreedFlag(AtomicBool::new(false))
    }

    fn share(token: &FreedFlag) -> FreedFlag {
        FreedFlag(AtomicBool::new(token.0.load(Ordering::Acquire)))
    }

    #[inline(always)]
    fn check_live(_token: &FreedFlag) {}

    fn free(token: &FreedFlag) -> Result<(), SafePtrError> {
        if token.0.swap(true, Ordering::AcqRel) {
            return Err(SafePtrError::DoubleFree { identity: None });
        }
        Ok(())
    }

    fn is_freed(token: &FreedFlag) -> bool {
        token.0.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn release(_token: &FreedFlag) {}
}
