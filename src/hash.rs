//! Hash primitives used around share validation.
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::types::{EpochNumber, HASH_BYTES};

/// SHA-256 applied twice, as used for block and transaction identifiers.
///
/// Any input length is accepted, including empty input.
pub fn sha256d(input: &[u8]) -> [u8; HASH_BYTES] {
    let mut hasher = Sha256::new();
    hasher.update(input);
    let first = hasher.finalize();

    let mut hasher = Sha256::new();
    hasher.update(first);
    hasher.finalize().into()
}

/// Seed hash identifying the dataset of `epoch`.
///
/// Starts from 32 zero bytes and applies Keccak-256 once per epoch, so epoch 0
/// yields the zero hash. Stratum jobs carry this value so miners can build the
/// matching dataset.
pub fn seed_hash(epoch: EpochNumber) -> [u8; HASH_BYTES] {
    let mut seed = [0u8; HASH_BYTES];
    for _ in 0..epoch.get() {
        seed = Keccak256::digest(seed).into();
    }
    seed
}
