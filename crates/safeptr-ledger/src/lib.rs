//! Allocation ledger for SafePtr lifetime tracking.
//!
//! This is the leaf crate of the workspace. It knows nothing about element
//! storage; it only keeps the books that let `safeptr` detect misuse of
//! explicitly freed buffers:
//!
//! ```text
//! Registry (one per element type, or injected)
//! ├── Mutex<Ledger>
//! │   ├── IndexMap<Identity, Entry { refs, deleted }>
//! │   └── identity counter (+ wraparound probing)
//! └── RwLock<Arc<dyn Reporter>>  (print / raise / log)
//! ```
//!
//! # Misuse classes
//!
//! - **Use-after-free:** an access on an identity already marked deleted.
//!   Reported as a [`Warning`].
//! - **Leak:** the last holder of an identity goes away and the identity was
//!   never marked deleted. Reported as a [`Warning`].
//! - **Double free:** marking an identity deleted twice. Always an error
//!   ([`LedgerError::DoubleFree`]), whatever the reporting mode.
//!
//! Warnings never travel through `Result`. They go to the registry's
//! [`Reporter`], selected by [`ReportMode`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod identity;
pub mod registry;
pub mod report;
pub mod warning;

pub use config::{RegistryConfig, ReportMode};
pub use error::LedgerError;
pub use identity::Identity;
pub use registry::Registry;
pub use report::{RaiseReporter, Reporter, StderrReporter, TracingReporter};
pub use warning::{Warning, WarningKind};
