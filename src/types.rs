use std::fmt::{self, Display, Formatter};

use crate::error::Error;

/// Block height as seen by the chain.
pub type BlockHeight = u64;

/// Miner-chosen 64-bit nonce.
pub type Nonce = u64;

/// Length in bytes of every hash handled by the verifier.
pub const HASH_BYTES: usize = 32;

/// Length in bytes of a nonce buffer at the host boundary.
pub const NONCE_BYTES: usize = 8;

macro_rules! hash256 {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name([u8; HASH_BYTES]);

        impl $name {
            pub const fn new(bytes: [u8; HASH_BYTES]) -> Self {
                Self(bytes)
            }

            /// Copy a 32-byte slice, rejecting any other length.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
                let array: [u8; HASH_BYTES] = bytes.try_into().map_err(|_| {
                    Error::invalid_argument(format!(
                        "{} must be {} bytes, got {}",
                        $what,
                        HASH_BYTES,
                        bytes.len()
                    ))
                })?;
                Ok(Self(array))
            }

            /// Parse 64 hex characters, with or without a `0x` prefix.
            pub fn from_hex(s: &str) -> Result<Self, Error> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                if digits.len() != HASH_BYTES * 2 {
                    return Err(Error::invalid_argument(format!(
                        "{} must be {} hex characters, got {}",
                        $what,
                        HASH_BYTES * 2,
                        digits.len()
                    )));
                }
                let bytes = hex::decode(digits).map_err(|e| {
                    Error::invalid_argument(format!("{} is not valid hex: {e}", $what))
                })?;
                Self::from_slice(&bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; HASH_BYTES] {
                &self.0
            }

            pub const fn into_bytes(self) -> [u8; HASH_BYTES] {
                self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; HASH_BYTES]> for $name {
            fn from(bytes: [u8; HASH_BYTES]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }
    };
}

hash256!(
    /// Hash of the block header the proof commits to.
    HeaderHash,
    "header hash"
);

hash256!(
    /// Mix value, either claimed by a miner or recomputed by the verifier.
    MixHash,
    "mix hash"
);

hash256!(
    /// Final hash of the mix computation; callers compare it against their target.
    ResultHash,
    "result hash"
);

/// Dataset epoch, derived from a block height by a fixed step function.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EpochNumber(pub u64);

impl EpochNumber {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for EpochNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of one mix computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixOutput {
    pub mix_hash: MixHash,
    pub result_hash: ResultHash,
}

/// Outcome of a completed verification.
///
/// `result_hash` is filled in whatever the verdict, so the caller can run its
/// own difficulty check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Verification {
    pub valid: bool,
    pub result_hash: ResultHash,
    pub epoch: EpochNumber,
}

/// Decode a little-endian nonce buffer.
pub fn nonce_from_le_slice(bytes: &[u8]) -> Result<Nonce, Error> {
    let array: [u8; NONCE_BYTES] = bytes.try_into().map_err(|_| {
        Error::invalid_argument(format!(
            "nonce must be {NONCE_BYTES} bytes, got {}",
            bytes.len()
        ))
    })?;
    Ok(u64::from_le_bytes(array))
}
