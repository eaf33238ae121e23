//! The allocation registry.
//!
//! [`Registry`] maps every tracked [`Identity`] to a reference count and a
//! deleted flag. All ledger state sits behind one `Mutex` per registry, and
//! there is one global registry per element type, so unrelated element
//! types never contend. The lock is held only for the O(1) map update;
//! warnings are reported after it is released.

use std::any::{self, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;

use crate::config::RegistryConfig;
use crate::error::LedgerError;
use crate::identity::Identity;
use crate::report::Reporter;
use crate::warning::{Warning, WarningKind};

/// Per-identity ledger record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    /// Logical holders of this identity. Never zero while the entry exists.
    refs: usize,
    /// Set by `free()`.
    deleted: bool,
}

/// The mutex-protected part of a registry.
#[derive(Debug)]
struct Ledger {
    entries: IndexMap<Identity, Entry>,
    /// Last identity handed out.
    counter: u64,
    /// Whether `counter` has wrapped past `u64::MAX` at least once. From
    /// then on, fresh identities must be probed against live entries.
    wrapped: bool,
}

impl Ledger {
    fn new(seed: u64) -> Self {
        Self {
            entries: IndexMap::new(),
            counter: seed,
            wrapped: false,
        }
    }

    fn next_identity(&mut self) -> Identity {
        self.counter = self.counter.wrapping_add(1);
        if self.counter == 0 && !self.wrapped {
            self.wrapped = true;
            tracing::debug!("identity counter wrapped, probing for unused identities");
        }
        if self.wrapped {
            while self.entries.contains_key(&Identity(self.counter)) {
                self.counter = self.counter.wrapping_add(1);
            }
        }
        Identity(self.counter)
    }

    fn insert(&mut self, deleted: bool) -> Identity {
        let identity = self.next_identity();
        self.entries.insert(identity, Entry { refs: 1, deleted });
        identity
    }
}

type RegistryTable = RwLock<HashMap<TypeId, Arc<Registry>>>;

/// Process-wide registries, one per element type, created on first use and
/// never torn down.
static GLOBAL_REGISTRIES: OnceLock<RegistryTable> = OnceLock::new();

/// Ledger of tracked allocations plus the sink for their warnings.
///
/// Every operation is atomic with respect to every other operation on the
/// same registry. Identities from one registry mean nothing to another.
#[derive(Debug)]
pub struct Registry {
    name: &'static str,
    ledger: Mutex<Ledger>,
    reporter: RwLock<Arc<dyn Reporter>>,
}

impl Registry {
    /// Create a standalone registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            name: config.name,
            ledger: Mutex::new(Ledger::new(config.identity_seed)),
            reporter: RwLock::new(config.report.reporter()),
        }
    }

    /// Create a standalone registry with a custom sink.
    pub fn with_reporter(name: &'static str, reporter: Arc<dyn Reporter>) -> Self {
        let registry = Self::new(RegistryConfig::named(name));
        registry.set_reporter(reporter);
        registry
    }

    /// The process-wide registry for element type `T`.
    ///
    /// Created with [`RegistryConfig::named`] and the type name on first
    /// call. Later calls return the same registry.
    pub fn global<T: 'static>() -> Arc<Self> {
        let table = GLOBAL_REGISTRIES.get_or_init(Default::default);
        let key = TypeId::of::<T>();
        if let Some(registry) = table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(registry);
        }
        let mut table = table.write().unwrap_or_else(PoisonError::into_inner);
        let registry = table.entry(key).or_insert_with(|| {
            tracing::debug!(element = any::type_name::<T>(), "creating global registry");
            Arc::new(Self::new(RegistryConfig::named(any::type_name::<T>())))
        });
        Arc::clone(registry)
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The current warning sink.
    pub fn reporter(&self) -> Arc<dyn Reporter> {
        Arc::clone(&self.reporter.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the warning sink. Affects every later report.
    pub fn set_reporter(&self, reporter: Arc<dyn Reporter>) {
        *self.reporter.write().unwrap_or_else(PoisonError::into_inner) = reporter;
    }

    /// Record a fresh live allocation with one holder.
    pub fn register_new(&self) -> Identity {
        let identity = self.lock().insert(false);
        tracing::trace!(registry = self.name, identity = identity.get(), "registered");
        identity
    }

    /// Record an allocation-less placeholder with one holder.
    ///
    /// The entry starts out deleted, so dropping the placeholder without
    /// `free()` is not a leak, while accessing or freeing it is reported
    /// exactly as for a freed buffer.
    pub fn register_placeholder(&self) -> Identity {
        let identity = self.lock().insert(true);
        tracing::trace!(
            registry = self.name,
            identity = identity.get(),
            "registered placeholder"
        );
        identity
    }

    /// Add a holder to `identity` and return the new count.
    ///
    /// An unknown identity reports [`WarningKind::RefCountUnderflow`] and
    /// returns 0: its count already reached zero once.
    pub fn increment(&self, identity: Identity) -> usize {
        let refs = {
            let mut ledger = self.lock();
            ledger.entries.get_mut(&identity).map(|entry| {
                entry.refs += 1;
                entry.refs
            })
        };
        match refs {
            Some(refs) => refs,
            None => {
                self.warn(WarningKind::RefCountUnderflow, identity);
                0
            }
        }
    }

    /// Remove a holder from `identity` and return the new count.
    ///
    /// When the count reaches zero the entry is erased, and a
    /// [`WarningKind::Leak`] is reported if the identity was never marked
    /// deleted. An unknown identity reports
    /// [`WarningKind::RefCountUnderflow`] instead of going below zero.
    pub fn decrement(&self, identity: Identity) -> usize {
        let outcome = {
            let mut ledger = self.lock();
            match ledger.entries.get_mut(&identity) {
                None => None,
                Some(entry) => {
                    entry.refs -= 1;
                    let (refs, deleted) = (entry.refs, entry.deleted);
                    if refs == 0 {
                        ledger.entries.swap_remove(&identity);
                    }
                    Some((refs, deleted))
                }
            }
        };
        match outcome {
            None => {
                self.warn(WarningKind::RefCountUnderflow, identity);
                0
            }
            Some((0, deleted)) => {
                tracing::trace!(registry = self.name, identity = identity.get(), "erased");
                if !deleted {
                    self.warn(WarningKind::Leak, identity);
                }
                0
            }
            Some((refs, _)) => refs,
        }
    }

    /// Mark `identity` as freed.
    ///
    /// # Errors
    ///
    /// [`LedgerError::DoubleFree`] if it was already marked, or is no longer
    /// in the ledger. Returned in every reporting mode.
    pub fn mark_deleted(&self, identity: Identity) -> Result<(), LedgerError> {
        let mut ledger = self.lock();
        match ledger.entries.get_mut(&identity) {
            Some(entry) if !entry.deleted => {
                entry.deleted = true;
                Ok(())
            }
            _ => Err(LedgerError::DoubleFree { identity }),
        }
    }

    /// Report [`WarningKind::UseAfterFree`] if `identity` was freed.
    ///
    /// Called before every buffer access. An identity missing from the
    /// ledger counts as freed.
    pub fn check_live(&self, identity: Identity) {
        if self.is_deleted(identity).unwrap_or(true) {
            self.warn(WarningKind::UseAfterFree, identity);
        }
    }

    /// Current holder count, or `None` if the identity is not in the ledger.
    pub fn ref_count(&self, identity: Identity) -> Option<usize> {
        self.lock().entries.get(&identity).map(|entry| entry.refs)
    }

    /// Whether `identity` was freed, or `None` if it is not in the ledger.
    pub fn is_deleted(&self, identity: Identity) -> Option<bool> {
        self.lock().entries.get(&identity).map(|entry| entry.deleted)
    }

    /// Number of identities currently in the ledger, freed or not.
    pub fn live_count(&self) -> usize {
        self.lock().entries.len()
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // Ledger updates cannot panic halfway, so a poisoned lock still
        // guards consistent state.
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn warn(&self, kind: WarningKind, identity: Identity) {
        let reporter = self.reporter();
        reporter.report(&Warning::new(kind, identity, self.name));
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
