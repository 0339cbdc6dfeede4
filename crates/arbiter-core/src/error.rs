//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared by every crate in the workspace. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every error aborts the whole operation. No operation in the stack
//!   leaves partial state behind when it returns `Err`.
//! - Every error can be classified with [`ErrorKind`], so a caller can tell
//!   a malformed request from a permission problem, a state conflict, or an
//!   integrity failure without matching on individual variants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Address;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Zero or invalid amount, malformed address, malformed payload.
    Validation,
    /// Caller does not hold the role the operation requires.
    Authorization,
    /// Target record missing, already closed, or balance insufficient.
    State,
    /// Commitment mismatch or failed delegated execution.
    Integrity,
}

impl ErrorKind {
    /// The canonical string name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::Authorization => "AUTHORIZATION",
            Self::State => "STATE",
            Self::Integrity => "INTEGRITY",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer for amount: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

impl CanonicalizationError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Error decoding a hex-encoded [`Address`] or digest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// A required prefix (`0x` for addresses) is missing.
    #[error("missing 0x prefix: {0:?}")]
    MissingPrefix(String),

    /// Wrong number of hex digits.
    #[error("expected {expected} hex digits, got {actual}")]
    InvalidLength {
        /// Required number of hex digits.
        expected: usize,
        /// Number of hex digits supplied.
        actual: usize,
    },

    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid hex character {0:?}")]
    InvalidHex(char),
}

impl HexError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Errors from the owner gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Caller is not the current owner.
    #[error("caller {caller} is not the owner")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
    },

    /// The null identity cannot hold ownership.
    #[error("the null address cannot be an owner")]
    InvalidAddress,
}

impl AccessError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner { .. } => ErrorKind::Authorization,
            Self::InvalidAddress => ErrorKind::Validation,
        }
    }
}

/// Failure reported by an [`Arbitrable`](crate::action::Arbitrable) target
/// when it refuses or cannot complete a delegated action.
///
/// Carries the target's own classification and message so the delegating
/// side can surface them without knowing the target's error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} failure: {reason}")]
pub struct ActionRejected {
    /// Classification of the target-side failure.
    pub kind: ErrorKind,
    /// Target-side error message.
    pub reason: String,
}

impl ActionRejected {
    /// Build a rejection with the given kind and message.
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<AccessError> for ActionRejected {
    fn from(err: AccessError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}
