use derive_builder::Builder;

use crate::error::Error;
use crate::types::{BlockHeight, EpochNumber};

/// Blocks per dataset epoch on the Firo chain.
pub const FIROPOW_EPOCH_LENGTH: u64 = 1300;

/// Verifier policy: the epoch step function and the supported epoch range.
#[derive(Builder, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[builder(pattern = "owned")]
#[serde(default)]
pub struct VerifierConfig {
    /// Number of consecutive heights sharing one dataset.
    #[builder(default = "FIROPOW_EPOCH_LENGTH")]
    pub epoch_length: u64,
    /// Highest epoch the verifier will build a context for. `None` leaves the
    /// limit to the algorithm.
    #[builder(default, setter(strip_option))]
    pub max_epoch: Option<u64>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            epoch_length: FIROPOW_EPOCH_LENGTH,
            max_epoch: None,
        }
    }
}

impl VerifierConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.epoch_length == 0 {
            return Err(Error::InvalidConfig("epoch_length must be >= 1".into()));
        }
        Ok(())
    }

    /// Load and validate a config from its JSON form. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: VerifierConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Epoch containing `height`.
    ///
    /// The fields are public, so a config may reach here unvalidated; a zero
    /// `epoch_length` is reported as `InvalidConfig`.
    pub fn epoch_of(&self, height: BlockHeight) -> Result<EpochNumber, Error> {
        height
            .checked_div(self.epoch_length)
            .map(EpochNumber)
            .ok_or_else(|| Error::InvalidConfig("epoch_length must be >= 1".into()))
    }

    /// Reject epochs above `max_epoch` before any dataset is allocated.
    pub fn check_epoch(&self, epoch: EpochNumber) -> Result<(), Error> {
        match self.max_epoch {
            Some(max) if epoch.get() > max => Err(Error::InvalidArgument(format!(
                "epoch {epoch} exceeds the supported maximum {max}"
            ))),
            _ => Ok(()),
        }
    }
}

impl VerifierConfigBuilder {
    pub fn build_validated(self) -> Result<VerifierConfig, Error> {
        let config = self
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
