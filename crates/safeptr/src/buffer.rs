//! The owned buffer and its lifecycle.
//!
//! Physical ownership and leak bookkeeping are kept apart. The elements
//! live in a `Box<[T]>` that is moved strictly: [`SafePtr::take`] leaves
//! the source empty, so no storage is ever released twice. The ledger
//! token rides alongside and is the only place where several owners of
//! record exist: a taken-from source keeps sharing the identity, and every
//! instance releases its share on drop whether or not it still holds
//! storage.

use std::marker::PhantomData;
use std::mem;
use std::sync::Arc;

use safeptr_ledger::{Identity, Registry};

use crate::error::SafePtrError;
use crate::mode::{DefaultTracking, Ticket, Tracked, Tracking};

/// A heap-allocated, fixed-length array with explicit `free()`.
///
/// In [`Tracked`] mode every access first checks the ledger, so touching a
/// freed buffer, forgetting to free one, and freeing one twice are all
/// diagnosed. In [`Untracked`](crate::Untracked) mode only the double free
/// is.
///
/// A plain Rust move (`let b = a;`) needs no bookkeeping: the identity
/// travels with the value. Use [`take`](Self::take) or
/// [`move_from`](Self::move_from) when the source stays in use afterwards.
pub struct SafePtr<T, M: Tracking = DefaultTracking> {
    pub(crate) storage: Box<[T]>,
    pub(crate) token: M::Token,
    _mode: PhantomData<M>,
}

impl<T: 'static> SafePtr<T> {
    /// Allocate `len` default-valued elements in the default mode.
    ///
    /// `len == 0` yields an empty buffer that still has to be freed.
    pub fn new(len: usize) -> Self
    where
        T: Default,
    {
        Self::with_len(len)
    }

    /// Allocate a copy of `items` in the default mode.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_cloned(items)
    }
}

impl<T: 'static, M: Tracking> SafePtr<T, M> {
    /// Allocate `len` default-valued elements.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_parts(default_storage(len), M::fresh::<T>())
    }

    /// Allocate a copy of `items`.
    pub fn from_cloned(items: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_parts(items.into(), M::fresh::<T>())
    }

    /// An empty placeholder that counts as already freed.
    ///
    /// Dropping it is never a leak. It is meant as a target for
    /// [`move_from`](Self::move_from) or `clone_from`; freeing it is a
    /// double free.
    pub fn placeholder() -> Self {
        Self::from_parts(Box::default(), M::placeholder::<T>())
    }
}

impl<T> SafePtr<T, Tracked> {
    /// Allocate `len` default-valued elements recorded in `registry`.
    pub fn new_in(len: usize, registry: &Arc<Registry>) -> Self
    where
        T: Default,
    {
        Self::from_parts(default_storage(len), Ticket::register(registry))
    }

    /// Take ownership of `items`, recorded in `registry`.
    pub fn from_vec_in(items: Vec<T>, registry: &Arc<Registry>) -> Self {
        Self::from_parts(items.into_boxed_slice(), Ticket::register(registry))
    }

    /// A placeholder recorded in `registry`. See [`SafePtr::placeholder`].
    pub fn placeholder_in(registry: &Arc<Registry>) -> Self {
        Self::from_parts(Box::default(), Ticket::register_placeholder(registry))
    }

    /// The ledger identity this instance holds.
    pub fn identity(&self) -> Identity {
        self.token.identity()
    }

    /// The registry this instance is recorded in.
    pub fn registry(&self) -> &Arc<Registry> {
        self.token.registry()
    }
}

impl<T, M: Tracking> SafePtr<T, M> {
    fn from_parts(storage: Box<[T]>, token: M::Token) -> Self {
        Self {
            storage,
            token,
            _mode: PhantomData,
        }
    }

    pub(crate) fn check(&self) {
        M::check_live(&self.token);
    }

    /// Move the elements into a new instance that shares this one's
    /// identity.
    ///
    /// `self` is left empty but stays a holder of record: it must still be
    /// dropped, and freeing either instance frees the shared identity.
    /// Taking from a freed buffer is reported as a use-after-free.
    pub fn take(&mut self) -> Self {
        self.check();
        let token = M::share(&self.token);
        Self::from_parts(mem::take(&mut self.storage), token)
    }

    /// Replace this buffer with the elements of `source`, sharing its
    /// identity. Move-assignment.
    ///
    /// The identity held so far is released first in ledger terms: if this
    /// was its last holder and it was never freed, a leak is reported.
    /// `source` is left empty but remains a holder of record.
    pub fn move_from(&mut self, source: &mut Self) {
        source.check();
        let token = M::share(&source.token);
        let storage = mem::take(&mut source.storage);
        let old_token = mem::replace(&mut self.token, token);
        self.storage = storage;
        M::release(&old_token);
    }

    /// Release the allocation.
    ///
    /// The elements are dropped right away and this instance is left
    /// empty. Afterwards every access is reported as a use-after-free
    /// (tracked mode) and sees no elements.
    ///
    /// # Errors
    ///
    /// [`SafePtrError::DoubleFree`] if this allocation was already freed,
    /// through this instance or any instance sharing its identity. Returned
    /// in every mode. Whatever this instance still held is released anyway.
    pub fn free(&mut self) -> Result<(), SafePtrError> {
        let result = M::free(&self.token);
        self.storage = Box::default();
        result
    }

    /// Whether `free()` has been called on this allocation. Never reports.
    pub fn is_freed(&self) -> bool {
        M::is_freed(&self.token)
    }
}

impl<T: Clone, M: Tracking> Clone for SafePtr<T, M> {
    /// Copy into an independent allocation with a fresh identity.
    ///
    /// Copying a freed buffer is reported as a use-after-free, then proceeds.
    fn clone(&self) -> Self {
        self.check();
        Self::from_parts(self.storage.clone(), M::copy_of(&self.token))
    }

    /// Copy-assignment: replace this buffer with an independent copy of
    /// `source`.
    ///
    /// The identity held so far is released as in
    /// [`move_from`](Self::move_from).
    fn clone_from(&mut self, source: &Self) {
        source.check();
        let token = M::copy_of(&source.token);
        let old_token = mem::replace(&mut self.token, token);
        self.storage = source.storage.clone();
        M::release(&old_token);
    }
}

impl<T, M: Tracking> Drop for SafePtr<T, M> {
    fn drop(&mut self) {
        M::release(&self.token);
    }
}

impl<T: 'static, M: Tracking> Default for SafePtr<T, M> {
    /// See [`SafePtr::placeholder`].
    fn default() -> Self {
        Self::placeholder()
    }
}

impl<T: 'static, M: Tracking> From<Vec<T>> for SafePtr<T, M> {
    fn from(items: Vec<T>) -> Self {
        Self::from_parts(items.into_boxed_slice(), M::fresh::<T>())
    }
}

impl<T: 'static, M: Tracking, const N: usize> From<[T; N]> for SafePtr<T, M> {
    fn from(items: [T; N]) -> Self {
        Self::from_parts(Box::from(items), M::fresh::<T>())
    }
}

impl<T: 'static, M: Tracking> FromIterator<T> for SafePtr<T, M> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_parts(iter.into_iter().collect(), M::fresh::<T>())
    }
}

fn default_storage<T: Default>(len: usize) -> Box<[T]> {
    (0..len).map(|_| T::default()).collect()
}
