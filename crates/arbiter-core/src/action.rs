//! # Resolution Actions and the Arbitrable Capability
//!
//! A dispute can be bound to a concrete enforcement action without
//! disclosing it: the registry stores only the digest of the action's
//! canonical encoding. Whoever later resolves the dispute reveals the
//! action; it is enacted only if its digest equals the stored commitment.
//!
//! [`ResolutionAction`] is the closed set of actions a target can be asked
//! to perform. [`Arbitrable`] is the narrow capability a target exposes to
//! the registry: apply one action on behalf of a caller, atomically.
//!
//! ## Commitment Encoding
//!
//! ```text
//! commitment = sha256( JCS( serde_json(action) ) )
//! ```
//!
//! Committer and revealer both go through [`ResolutionAction::commitment`],
//! so the digest is bit-exact on both sides. [`ResolutionAction::NoAction`]
//! is the sentinel for "resolve without touching the target"; it has a
//! commitment of its own and is distinct from a dispute that has no
//! commitment at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::{ActionRejected, CanonicalizationError};
use crate::identity::{Address, Caller};
use crate::notification::Receipt;

/// An enforcement action a resolution may commit to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResolutionAction {
    /// Resolve without any effect on the target.
    NoAction,
    /// Move a locked deposit to the payee's released balance.
    ForceReleaseDeposit {
        /// Payee of the lock.
        payee: Address,
        /// Payer of the lock.
        payer: Address,
        /// Amount to release.
        amount: Amount,
    },
    /// Return a locked deposit to its payer.
    RevertDeposit {
        /// Payee of the lock.
        payee: Address,
        /// Payer of the lock.
        payer: Address,
        /// Amount to return.
        amount: Amount,
    },
    /// Hand the target's owner authority to another identity.
    TransferOwnership {
        /// Identity receiving ownership.
        new_owner: Address,
    },
}

impl ResolutionAction {
    /// Short name, as used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoAction => "no_action",
            Self::ForceReleaseDeposit { .. } => "force_release_deposit",
            Self::RevertDeposit { .. } => "revert_deposit",
            Self::TransferOwnership { .. } => "transfer_ownership",
        }
    }

    /// The canonical encoding: the bytes a revealer publishes.
    ///
    /// # Errors
    ///
    /// Propagates [`CanonicalizationError`].
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    /// The digest a committer stores for this action.
    ///
    /// # Errors
    ///
    /// Propagates [`CanonicalizationError`].
    pub fn commitment(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }

    /// Commitment to [`ResolutionAction::NoAction`].
    ///
    /// # Errors
    ///
    /// Propagates [`CanonicalizationError`].
    pub fn no_action_commitment() -> Result<ContentDigest, CanonicalizationError> {
        Self::NoAction.commitment()
    }

    /// Decode an action from its wire encoding.
    ///
    /// Any JSON encoding of the same action decodes to the same value and
    /// therefore to the same commitment.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::SerializationFailed`] if the bytes
    /// are not a valid action.
    pub fn decode(bytes: &[u8]) -> Result<Self, CanonicalizationError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl std::fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAction => f.write_str("no_action"),
            Self::ForceReleaseDeposit {
                payee,
                payer,
                amount,
            } => write!(f, "force_release_deposit:{payee}:{payer}:{amount}"),
            Self::RevertDeposit {
                payee,
                payer,
                amount,
            } => write!(f, "revert_deposit:{payee}:{payer}:{amount}"),
            Self::TransferOwnership { new_owner } => write!(f, "transfer_ownership:{new_owner}"),
        }
    }
}

/// A target that lets a delegating authority apply resolution actions.
///
/// Implementations apply the action exactly as if `caller` had invoked the
/// corresponding operation directly, including every role check. Granting
/// the registry authority is therefore the target's own decision (for a
/// custody ledger: transferring ownership to the registry), taken before
/// any dispute is resolved.
///
/// `enact` must be atomic: on `Err` the target's state is unchanged.
pub trait Arbitrable {
    /// The target's own identity.
    fn address(&self) -> Address;

    /// Apply `action` on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionRejected`] with the target's classification when the
    /// action is refused or cannot complete.
    fn enact(&mut self, caller: &Caller, action: &ResolutionAction)
        -> Result<Receipt, ActionRejected>;
}

impl<T: Arbitrable + ?Sized> Arbitrable for Box<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn enact(
        &mut self,
        caller: &Caller,
        action: &ResolutionAction,
    ) -> Result<Receipt, ActionRejected> {
        (**self).enact(caller, action)
    }
}

/// Resolves an arbitrable address to the live target it names.
///
/// A single target resolves only its own address; a map resolves any key
/// it holds; [`NoArbitrables`] resolves nothing.
pub trait ArbitrableLookup {
    /// The target registered at `address`, if any.
    fn resolve(&mut self, address: Address) -> Option<&mut dyn Arbitrable>;
}

impl<A: Arbitrable> ArbitrableLookup for A {
    fn resolve(&mut self, address: Address) -> Option<&mut dyn Arbitrable> {
        if Arbitrable::address(self) == address {
            Some(self)
        } else {
            None
        }
    }
}

impl<A: Arbitrable> ArbitrableLookup for BTreeMap<Address, A> {
    fn resolve(&mut self, address: Address) -> Option<&mut dyn Arbitrable> {
        self.get_mut(&address).map(|target| target as &mut dyn Arbitrable)
    }
}

/// A lookup with no targets, for registries that only hold informational
/// disputes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoArbitrables;

impl ArbitrableLookup for NoArbitrables {
    fn resolve(&mut self, _address: Address) -> Option<&mut dyn Arbitrable> {
        None
    }
}
