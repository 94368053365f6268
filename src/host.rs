//! Entry points for a host runtime that hands over raw byte buffers.
//!
//! Buffers are validated here and converted into fixed-size values before
//! they reach the verifier; nothing past this module re-checks lengths.
use crate::algorithm::EpochAlgorithm;
use crate::error::Error;
use crate::hash;
use crate::types::{
    nonce_from_le_slice, HeaderHash, MixHash, Nonce, Verification, HASH_BYTES, NONCE_BYTES,
};
use crate::verifier::ProofOfWorkVerifier;

/// Verify a FiroPoW solution given as raw buffers.
///
/// `nonce` holds the 8 little-endian bytes of the 64-bit nonce. On success the
/// recomputed result hash is written to `hash_out` whatever the verdict; on
/// error `hash_out` is left untouched.
pub fn firopow<A: EpochAlgorithm>(
    verifier: &ProofOfWorkVerifier<A>,
    header_hash: &[u8],
    nonce: &[u8],
    block_height: i64,
    mix_hash: &[u8],
    hash_out: &mut [u8],
) -> Result<bool, Error> {
    let header_hash = HeaderHash::from_slice(header_hash)?;
    let nonce = nonce_from_le_slice(nonce)?;
    let mix_hash = MixHash::from_slice(mix_hash)?;
    let height = u64::try_from(block_height).map_err(|_| {
        Error::InvalidArgument(format!("block height must be >= 0, got {block_height}"))
    })?;
    if hash_out.len() != HASH_BYTES {
        return Err(Error::InvalidArgument(format!(
            "output buffer must be {HASH_BYTES} bytes, got {}",
            hash_out.len()
        )));
    }

    let verification = verifier.verify(&header_hash, nonce, height, &mix_hash)?;
    hash_out.copy_from_slice(verification.result_hash.as_bytes());
    Ok(verification.valid)
}

/// Double SHA-256 of `input`, returned as a freshly allocated 32-byte buffer.
pub fn sha256d(input: &[u8]) -> Vec<u8> {
    hash::sha256d(input).to_vec()
}

/// A share as submitted by a miner over stratum, already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Share {
    pub header_hash: HeaderHash,
    pub nonce: Nonce,
    pub mix_hash: MixHash,
}

impl Share {
    /// Decode the hex fields of a submission.
    ///
    /// Stratum miners send the nonce as big-endian hex, the reverse of the
    /// little-endian buffer [`firopow`] takes.
    pub fn from_hex(header_hash: &str, nonce: &str, mix_hash: &str) -> Result<Self, Error> {
        let header_hash = HeaderHash::from_hex(header_hash)?;
        let mix_hash = MixHash::from_hex(mix_hash)?;
        let digits = nonce.strip_prefix("0x").unwrap_or(nonce);
        if digits.len() != NONCE_BYTES * 2 {
            return Err(Error::InvalidArgument(format!(
                "nonce must be {} hex characters, got {}",
                NONCE_BYTES * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; NONCE_BYTES];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidArgument(format!("nonce is not valid hex: {e}")))?;
        Ok(Self {
            header_hash,
            nonce: u64::from_be_bytes(bytes),
            mix_hash,
        })
    }

    pub fn verify<A: EpochAlgorithm>(
        &self,
        verifier: &ProofOfWorkVerifier<A>,
        height: u64,
    ) -> Result<Verification, Error> {
        verifier.verify(&self.header_hash, self.nonce, height, &self.mix_hash)
    }
}
