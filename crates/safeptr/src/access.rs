//! Element access.
//!
//! Every accessor checks the ledger once before touching the elements, so
//! in tracked mode any access after `free()` is reported.

use std::ops::{Index, IndexMut, Range};
use std::slice;

use crate::buffer::SafePtr;
use crate::error::SafePtrError;
use crate::mode::Tracking;

impl<T, M: Tracking> SafePtr<T, M> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.check();
        self.storage.len()
    }

    /// Whether the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.check();
        self.storage.is_empty()
    }

    /// Pointer to the first element.
    pub fn as_ptr(&self) -> *const T {
        self.check();
        self.storage.as_ptr()
    }

    /// Mutable pointer to the first element.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.check();
        self.storage.as_mut_ptr()
    }

    /// The half-open pointer range `[begin, end)` spanning the elements.
    pub fn as_ptr_range(&self) -> Range<*const T> {
        self.check();
        self.storage.as_ptr_range()
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.check();
        &self.storage
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.check();
        &mut self.storage
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.check();
        self.storage.iter()
    }

    /// Iterate mutably over the elements.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.check();
        self.storage.iter_mut()
    }

    /// Checked element access.
    ///
    /// # Errors
    ///
    /// [`SafePtrError::OutOfRange`] when `index >= len`, in every mode.
    pub fn at(&self, index: usize) -> Result<&T, SafePtrError> {
        self.check();
        let len = self.storage.len();
        self.storage
            .get(index)
            .ok_or(SafePtrError::OutOfRange { index, len })
    }

    /// Checked mutable element access. See [`at`](Self::at).
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, SafePtrError> {
        self.check();
        let len = self.storage.len();
        self.storage
            .get_mut(index)
            .ok_or(SafePtrError::OutOfRange { index, len })
    }

    /// The first element, or `None` if empty.
    pub fn front(&self) -> Option<&T> {
        self.check();
        self.storage.first()
    }

    /// The last element, or `None` if empty.
    pub fn back(&self) -> Option<&T> {
        self.check();
        self.storage.last()
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.check();
        self.storage.fill(value);
    }
}

impl<T, M: Tracking> Index<usize> for SafePtr<T, M> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len`. Use [`SafePtr::at`] for a `Result`.
    fn index(&self, index: usize) -> &T {
        self.check();
        &self.storage[index]
    }
}

impl<T, M: Tracking> IndexMut<usize> for SafePtr<T, M> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.check();
        &mut self.storage[index]
    }
}

impl<'a, T, M: Tracking> IntoIterator for &'a SafePtr<T, M> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, M: Tracking> IntoIterator for &'a mut SafePtr<T, M> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: PartialEq, M: Tracking> PartialEq for SafePtr<T, M> {
    /// Element-wise comparison. Identities are not compared.
    ///
    /// Both operands are checked, left first, so comparing two freed
    /// buffers reports two use-after-free warnings. Under a raising
    /// reporter the left operand's warning is the one that unwinds, from
    /// inside whatever assertion made the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.check();
        other.check();
        self.storage == other.storage
    }
}

impl<T: Eq, M: Tracking> Eq for SafePtr<T, M> {}
