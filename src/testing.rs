//! Deterministic table-lookup algorithm for exercising the verifier.
//!
//! The context is a small table derived from the epoch; the mix walks it a
//! few times with SHA-256. It has the same shape as a real epoch algorithm
//! (expensive context, cheap lookups) while staying fast in tests.
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::algorithm::{BuildError, ComputeError, EpochAlgorithm};
use crate::hash::sha256d;
use crate::types::{BlockHeight, EpochNumber, HeaderHash, MixHash, MixOutput, Nonce, ResultHash};

const TABLE_ENTRIES: u32 = 64;
const ROUNDS: usize = 4;

/// Fixed vector for [`TableMix`] only.
///
/// Header, nonce and height come from a real FiroPoW share, but `MIX`, `RESULT`
/// and `NEXT_RESULT` are what `TableMix` produces for them. The share's real
/// FiroPoW mix (`3414b7c3...436d`, valid at 262523 and not at 262524) needs a
/// concrete FiroPoW `EpochAlgorithm` and is not checked by this crate.
pub(crate) mod vector {
    pub const HEADER: &str = "63543d3913fe56e6720c5e61e8d208d05582875822628f483279a3e8d9c9a8b3";
    /// Nonce as the 8-byte little-endian buffer handed to the binding.
    pub const NONCE_LE: &str = "9b95eb33003ba288";
    /// The same nonce as stratum hex (big-endian).
    pub const NONCE_BE: &str = "88a23b0033eb959b";
    pub const NONCE: u64 = 0x88a2_3b00_33eb_959b;
    pub const HEIGHT: u64 = 262_523;
    pub const MIX: &str = "20183dc3e373795ba5b668ab7235cfab888d705184699a232dbac2076a9513d7";
    pub const RESULT: &str = "b06a288949c8ff1f874ee455c96c9979042444bab006a13701923340bf0bafdd";
    /// Result for the same header and nonce one block later.
    pub const NEXT_RESULT: &str =
        "3f9ab85ff2df3190fd3bbb9969b57b8dd202fabda1cf3bb126dc353e35b1c370";
}

pub(crate) struct TableContext {
    table: Vec<[u8; 32]>,
    drops: Arc<AtomicUsize>,
}

impl Drop for TableContext {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct TableMix {
    builds: AtomicUsize,
    drops: Arc<AtomicUsize>,
    fail_builds: AtomicBool,
    fail_compute: AtomicBool,
}

impl TableMix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn fail_builds(&self, fail: bool) {
        self.fail_builds.store(fail, Ordering::SeqCst);
    }

    pub fn fail_compute(&self, fail: bool) {
        self.fail_compute.store(fail, Ordering::SeqCst);
    }
}

impl EpochAlgorithm for TableMix {
    type Context = TableContext;

    fn build_context(&self, epoch: EpochNumber) -> Result<TableContext, BuildError> {
        if self.fail_builds.load(Ordering::SeqCst) {
            return Err(BuildError::OutOfMemory { bytes: usize::MAX });
        }
        self.builds.fetch_add(1, Ordering::SeqCst);

        let mut hasher = Sha256::new();
        hasher.update(b"table-mix");
        hasher.update(epoch.get().to_le_bytes());
        let seed = hasher.finalize();

        let table: Vec<[u8; 32]> = (0..TABLE_ENTRIES)
            .map(|i| {
                let mut hasher = Sha256::new();
                hasher.update(seed);
                hasher.update(i.to_le_bytes());
                hasher.finalize().into()
            })
            .collect();

        Ok(TableContext {
            table,
            drops: self.drops.clone(),
        })
    }

    fn compute_mix(
        &self,
        context: &TableContext,
        height: BlockHeight,
        header_hash: &HeaderHash,
        nonce: Nonce,
    ) -> Result<MixOutput, ComputeError> {
        if self.fail_compute.load(Ordering::SeqCst) {
            return Err(ComputeError::Other("injected failure".into()));
        }

        let mut hasher = Sha256::new();
        hasher.update(header_hash);
        hasher.update(nonce.to_le_bytes());
        hasher.update(height.to_le_bytes());
        let mut acc: [u8; 32] = hasher.finalize().into();

        for _ in 0..ROUNDS {
            let entry = &context.table[acc[0] as usize % context.table.len()];
            let mut hasher = Sha256::new();
            hasher.update(acc);
            hasher.update(entry);
            acc = hasher.finalize().into();
        }

        let mut preimage = Vec::with_capacity(64);
        preimage.extend_from_slice(header_hash.as_bytes());
        preimage.extend_from_slice(&acc);

        Ok(MixOutput {
            mix_hash: MixHash::new(acc),
            result_hash: ResultHash::new(sha256d(&preimage)),
        })
    }
}
