//! Owned fixed-size buffers with explicit `free()` and misuse detection.
//!
//! [`SafePtr<T>`] owns a heap-allocated, fixed-length array. It never
//! grows, and its allocation ends when the caller says so with
//! [`SafePtr::free`]. In tracked builds a per-element-type ledger turns the
//! classic manual-memory bugs into diagnostics:
//!
//! | Misuse | Tracked | Untracked |
//! |--------|---------|-----------|
//! | access after `free()` | warning | not checked |
//! | dropped without `free()` | warning (leak) | not checked |
//! | `free()` twice | `Err(DoubleFree)` | `Err(DoubleFree)` |
//! | `at()` out of range | `Err(OutOfRange)` | `Err(OutOfRange)` |
//!
//! Warnings go to the registry's [`Reporter`]: printed to stderr by default,
//! raised as a typed panic in test mode, or logged through `tracing`.
//!
//! ```
//! use safeptr::SafePtr;
//!
//! let mut p = SafePtr::from_slice(&[4, 3, 2, 1]);
//! assert_eq!(p.len(), 4);
//! assert_eq!(p.at(0), Ok(&4));
//! p.fill(2);
//! assert!(p.iter().all(|&v| v == 2));
//! p.free().unwrap();
//! assert!(p.free().is_err());
//! ```
//!
//! # Tracking modes
//!
//! The second type parameter selects the bookkeeping ([`Tracked`] or
//! [`Untracked`]); it defaults to [`DefaultTracking`], which follows
//! `debug_assertions` unless the `release-tracking` feature is on. Tracked
//! buffers built with `new`/`from_slice`/`From` use the global registry of
//! their element type; `new_in`/`from_vec_in` take an explicit one.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod access;
pub mod buffer;
pub mod error;
pub mod mode;
pub mod print;

pub use buffer::SafePtr;
pub use error::SafePtrError;
pub use mode::{DefaultTracking, FreedFlag, Ticket, Tracked, Tracking, Untracked};
pub use print::{PRINT_ALL_LABEL, PRINT_LABEL, SUMMARY_LIMIT};

pub use safeptr_ledger as ledger;
pub use safeptr_ledger::{
    Identity, LedgerError, Registry, RegistryConfig, ReportMode, Reporter, Warning, WarningKind,
};
