//! # Custody Configuration
//!
//! Deployment parameters for one [`AssetCustody`](crate::AssetCustody)
//! instance, loadable from YAML:
//!
//! ```yaml
//! address: "0x00000000000000000000000000000000000000c1"
//! owner: "0x00000000000000000000000000000000000000a1"
//! ```

use arbiter_core::{Address, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a [`CustodyConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid YAML for this structure.
    #[error("invalid custody config: {0}")]
    Parse(String),

    /// A required identity is the null address.
    #[error("custody config field `{field}` must not be the null address")]
    NullAddress {
        /// Offending field name.
        field: &'static str,
    },
}

impl ConfigError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Parameters for constructing a custody ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustodyConfig {
    /// The ledger's own identity.
    pub address: Address,
    /// Initial owner.
    pub owner: Address,
}

impl CustodyConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed YAML or a null address.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the identities are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NullAddress`] naming the first null field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.is_zero() {
            return Err(ConfigError::NullAddress { field: "address" });
        }
        if self.owner.is_zero() {
            return Err(ConfigError::NullAddress { field: "owner" });
        }
        Ok(())
    }
}
