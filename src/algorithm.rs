use crate::types::{BlockHeight, EpochNumber, HeaderHash, MixOutput, Nonce};

/// Failure while generating an epoch context.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot allocate {bytes} bytes for the epoch dataset")]
    OutOfMemory { bytes: usize },
    #[error("epoch {0} is outside the supported range")]
    UnsupportedEpoch(EpochNumber),
    #[error("context generation failed: {0}")]
    Other(String),
}

/// Failure inside the mix function itself.
#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    #[error("mix computation failed: {0}")]
    Other(String),
}

/// Memory-hard proof-of-work algorithm keyed by a per-epoch context.
///
/// Implementations wrap the dataset generator and mix function of a concrete
/// algorithm (FiroPoW, KawPoW, ...). Both operations must be deterministic:
/// the verifier caches contexts and relies on identical inputs producing
/// identical outputs.
pub trait EpochAlgorithm: Send + Sync {
    /// Built dataset/cache for one epoch. Shared read-only between threads.
    type Context: Send + Sync;

    /// Generate the context for `epoch`.
    ///
    /// This is expected to be slow and memory hungry. An error must not leave
    /// any partially built state behind.
    fn build_context(&self, epoch: EpochNumber) -> Result<Self::Context, BuildError>;

    /// Run the mix function for a header and nonce.
    ///
    /// `height` is passed through because ProgPoW-family programs change with
    /// the block period, not only with the epoch.
    fn compute_mix(
        &self,
        context: &Self::Context,
        height: BlockHeight,
        header_hash: &HeaderHash,
        nonce: Nonce,
    ) -> Result<MixOutput, ComputeError>;
}
