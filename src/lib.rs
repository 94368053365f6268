//! FiroPoW share and block verification around a single-epoch context cache.
//!
//! The memory-hard algorithm itself is plugged in through [`EpochAlgorithm`];
//! this crate owns epoch derivation, context caching, the validity decision
//! and the raw-buffer entry points used by a pool or node host.
pub mod algorithm;
pub mod cache;
pub mod config;
pub mod error;
pub mod hash;
pub mod host;
pub mod types;
pub mod verifier;

#[cfg(test)]
mod testing;

pub use algorithm::{BuildError, ComputeError, EpochAlgorithm};
pub use cache::{CacheStats, EpochContextCache};
pub use config::{VerifierConfig, VerifierConfigBuilder, FIROPOW_EPOCH_LENGTH};
pub use error::Error;
pub use hash::{seed_hash, sha256d};
pub use host::Share;
pub use types::{
    BlockHeight, EpochNumber, HeaderHash, MixHash, MixOutput, Nonce, ResultHash, Verification,
};
pub use verifier::ProofOfWorkVerifier;
