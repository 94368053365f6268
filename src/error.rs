use crate::algorithm::{BuildError, ComputeError};
use crate::types::EpochNumber;

/// Errors surfaced by the verifier and its host boundary.
///
/// A `false` verdict is never an error: every variant here means the
/// verification could not run to completion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to build context for epoch {epoch}: {source}")]
    ContextBuild {
        epoch: EpochNumber,
        #[source]
        source: BuildError,
    },
    #[error("mix computation failed at height {height}: {source}")]
    Computation {
        height: u64,
        #[source]
        source: ComputeError,
    },
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
