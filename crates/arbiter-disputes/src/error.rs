//! # Arbitration Errors
//!
//! Every variant aborts the operation with no state change. A failed
//! resolution leaves the dispute open and the target untouched.

use arbiter_core::{
    AccessError, ActionRejected, Address, CanonicalizationError, ContentDigest, DisputeId,
    ErrorKind,
};
use thiserror::Error;

/// Errors from [`DisputeRegistry`](crate::DisputeRegistry) operations.
#[derive(Error, Debug)]
pub enum ArbitrationError {
    /// Caller does not hold a role the operation accepts.
    #[error("caller {caller} may not {operation} {dispute_id}; requires {required}")]
    NotAuthorized {
        /// The rejected caller.
        caller: Address,
        /// The dispute.
        dispute_id: DisputeId,
        /// Operation attempted.
        operation: &'static str,
        /// Roles the operation accepts.
        required: &'static str,
    },

    /// No dispute has this id.
    #[error("{0} not found")]
    DisputeNotFound(DisputeId),

    /// The dispute is in its terminal state.
    #[error("{0} is already closed")]
    DisputeAlreadyClosed(DisputeId),

    /// The revealed action does not match the stored commitment.
    #[error("resolution for {dispute_id} does not match commitment: expected {expected}, revealed {revealed}")]
    ResolutionHashMismatch {
        /// The dispute.
        dispute_id: DisputeId,
        /// Stored commitment.
        expected: ContentDigest,
        /// Digest of the revealed action.
        revealed: ContentDigest,
    },

    /// The dispute carries no resolution commitment.
    #[error("{0} has no resolution commitment")]
    NoResolutionCommitted(DisputeId),

    /// The arbitrable target refused the forwarded action or could not be
    /// reached.
    #[error("delegated call to {target} for {dispute_id} failed: {source}")]
    DelegatedCallFailed {
        /// The dispute.
        dispute_id: DisputeId,
        /// The arbitrable target.
        target: Address,
        /// Target-side failure.
        #[source]
        source: ActionRejected,
    },

    /// Claimant and defendant are the same identity.
    #[error("{0} cannot raise a dispute against itself")]
    SelfDispute(Address),

    /// A required identity is the null address.
    #[error("the null address is not a valid {0}")]
    InvalidAddress(&'static str),

    /// Every dispute id has been allocated.
    #[error("dispute id space exhausted")]
    IdSpaceExhausted,

    /// Owner gate failure.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The revealed action could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

impl ArbitrationError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthorized { .. } => ErrorKind::Authorization,
            Self::DisputeNotFound(_) | Self::DisputeAlreadyClosed(_) | Self::IdSpaceExhausted => {
                ErrorKind::State
            }
            Self::ResolutionHashMismatch { .. }
            | Self::NoResolutionCommitted(_)
            | Self::DelegatedCallFailed { .. } => ErrorKind::Integrity,
            Self::SelfDispute(_) | Self::InvalidAddress(_) => ErrorKind::Validation,
            Self::Access(err) => err.kind(),
            Self::Canonicalization(err) => err.kind(),
        }
    }
}
