use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use log::{debug, info, warn};

use crate::algorithm::BuildError;
use crate::error::Error;
use crate::types::EpochNumber;

/// Contents of the single cache slot. A context is only ever stored once it
/// is completely built.
enum Slot<C> {
    Empty,
    Built { epoch: EpochNumber, context: Arc<C> },
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub builds: u64,
    pub hits: u64,
    pub failures: u64,
}

/// Single-slot cache holding the context of the most recently requested epoch.
///
/// Readers of the held epoch clone an `Arc` under a short read lock and never
/// wait for a rebuild. Builds are serialised, so concurrent requests for the
/// same new epoch construct it once. A replaced context is released when the
/// last in-flight reader drops its handle.
pub struct EpochContextCache<C> {
    slot: RwLock<Slot<C>>,
    build_lock: Mutex<()>,
    builds: AtomicU64,
    hits: AtomicU64,
    failures: AtomicU64,
}

impl<C> EpochContextCache<C> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Empty),
            build_lock: Mutex::new(()),
            builds: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Return the context for `epoch`, building it with `build` on a miss.
    ///
    /// On success the new context replaces whatever was held. On failure the
    /// slot is left empty so the next call starts a fresh build.
    pub fn get_or_build<F>(&self, epoch: EpochNumber, build: F) -> Result<Arc<C>, Error>
    where
        F: FnOnce(EpochNumber) -> Result<C, BuildError>,
    {
        if let Some(context) = self.lookup(epoch) {
            return Ok(context);
        }

        let _building = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished this epoch while we waited.
        if let Some(context) = self.lookup(epoch) {
            return Ok(context);
        }

        info!("building epoch context for epoch {epoch}");
        let started = Instant::now();
        match build(epoch) {
            Ok(context) => {
                let context = Arc::new(context);
                let previous = self.replace(Slot::Built {
                    epoch,
                    context: Arc::clone(&context),
                });
                self.builds.fetch_add(1, Ordering::Relaxed);
                info!(
                    "epoch context for epoch {epoch} ready in {:.2?}",
                    started.elapsed()
                );
                if let Slot::Built { epoch: old, .. } = previous {
                    debug!("evicted epoch context for epoch {old}");
                }
                Ok(context)
            }
            Err(source) => {
                let previous = self.replace(Slot::Empty);
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("failed to build epoch context for epoch {epoch}: {source}");
                drop(previous);
                Err(Error::ContextBuild { epoch, source })
            }
        }
    }

    /// Epoch of the held context, if any.
    pub fn current_epoch(&self) -> Option<EpochNumber> {
        match &*self.read_slot() {
            Slot::Built { epoch, .. } => Some(*epoch),
            Slot::Empty => None,
        }
    }

    /// Release the held context.
    pub fn clear(&self) {
        let previous = self.replace(Slot::Empty);
        if let Slot::Built { epoch, .. } = previous {
            debug!("cleared epoch context for epoch {epoch}");
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            builds: self.builds.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn lookup(&self, epoch: EpochNumber) -> Option<Arc<C>> {
        let found = match &*self.read_slot() {
            Slot::Built { epoch: held, context } if *held == epoch => Some(Arc::clone(context)),
            _ => None,
        };
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Swap the slot and hand back the old value, so it is dropped after the
    /// write lock is released.
    fn replace(&self, next: Slot<C>) -> Slot<C> {
        std::mem::replace(&mut *self.write_slot(), next)
    }

    // Every write is a single assignment, so a poisoned lock still guards a
    // consistent slot.
    fn read_slot(&self) -> RwLockReadGuard<'_, Slot<C>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Slot<C>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C> Default for EpochContextCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EpochContextCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpochContextCache")
            .field("epoch", &self.current_epoch())
            .field("stats", &self.stats())
            .finish()
    }
}
