//! # Registry Configuration
//!
//! ```yaml
//! address: "0x00000000000000000000000000000000000000d1"
//! owner: "0x00000000000000000000000000000000000000a1"
//! arbitrators:
//!   - "0x00000000000000000000000000000000000000b1"
//! allow_self_dispute: false
//! ```

use arbiter_core::{Address, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a [`RegistryConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid YAML for this structure.
    #[error("invalid registry config: {0}")]
    Parse(String),

    /// A required identity is the null address.
    #[error("registry config field `{field}` must not contain the null address")]
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

/// Parameters for constructing a dispute registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// The registry's own identity; the caller it presents to targets.
    pub address: Address,
    /// Initial owner.
    pub owner: Address,
    /// Initial arbitrator set.
    #[serde(default)]
    pub arbitrators: Vec<Address>,
    /// Accept disputes whose claimant is also the defendant.
    #[serde(default)]
    pub allow_self_dispute: bool,
}

impl RegistryConfig {
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

    /// Check every identity is usable.
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
        if self.arbitrators.iter().any(Address::is_zero) {
            return Err(ConfigError::NullAddress {
                field: "arbitrators",
            });
        }
        Ok(())
    }
}
