use std::sync::Arc;

use log::trace;

use crate::algorithm::EpochAlgorithm;
use crate::cache::{CacheStats, EpochContextCache};
use crate::config::VerifierConfig;
use crate::error::Error;
use crate::hash;
use crate::types::{BlockHeight, EpochNumber, HeaderHash, MixHash, Nonce, Verification};

/// Proof-of-work verifier backed by a single-epoch context cache.
///
/// Create one per process at startup and share it (for example behind an
/// `Arc`); `verify` takes `&self` and is safe to call from many threads.
pub struct ProofOfWorkVerifier<A: EpochAlgorithm> {
    algorithm: A,
    config: VerifierConfig,
    cache: EpochContextCache<A::Context>,
}

impl<A: EpochAlgorithm> ProofOfWorkVerifier<A> {
    pub fn new(algorithm: A, config: VerifierConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            algorithm,
            config,
            cache: EpochContextCache::new(),
        })
    }

    /// Verify a share or block: recompute the mix for `header_hash` and
    /// `nonce` at `height` and compare it byte for byte with `mix_hash`.
    ///
    /// A mismatch is `Ok` with `valid == false`; errors mean the computation
    /// did not run. The result hash is returned either way.
    pub fn verify(
        &self,
        header_hash: &HeaderHash,
        nonce: Nonce,
        height: BlockHeight,
        mix_hash: &MixHash,
    ) -> Result<Verification, Error> {
        let epoch = self.config.epoch_of(height)?;
        let context = self.context_for(epoch)?;

        let output = self
            .algorithm
            .compute_mix(&context, height, header_hash, nonce)
            .map_err(|source| Error::Computation { height, source })?;

        let valid = output.mix_hash == *mix_hash;
        trace!("height {height} nonce {nonce:#018x}: valid={valid}");
        Ok(Verification {
            valid,
            result_hash: output.result_hash,
            epoch,
        })
    }

    /// Build the context for `height`'s epoch ahead of the first share.
    pub fn warm_up(&self, height: BlockHeight) -> Result<EpochNumber, Error> {
        let epoch = self.config.epoch_of(height)?;
        self.context_for(epoch)?;
        Ok(epoch)
    }

    pub fn epoch_of(&self, height: BlockHeight) -> Result<EpochNumber, Error> {
        self.config.epoch_of(height)
    }

    /// Seed hash of the dataset used at `height`, as published in stratum jobs.
    ///
    /// Costs one Keccak-256 per epoch, so heights above `max_epoch` are
    /// rejected the same way `verify` rejects them.
    pub fn seed_hash_for_height(&self, height: BlockHeight) -> Result<[u8; 32], Error> {
        let epoch = self.config.epoch_of(height)?;
        self.config.check_epoch(epoch)?;
        Ok(hash::seed_hash(epoch))
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn cache(&self) -> &EpochContextCache<A::Context> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn context_for(&self, epoch: EpochNumber) -> Result<Arc<A::Context>, Error> {
        self.config.check_epoch(epoch)?;
        self.cache
            .get_or_build(epoch, |epoch| self.algorithm.build_context(epoch))
    }
}
