//! # Notifications and Receipts
//!
//! Every successful state change emits one or more [`Notification`]s, in
//! order, collected into the [`Receipt`] the operation returns. A failed
//! operation returns no receipt and emits nothing.
//!
//! Observers distinguish voluntary releases from owner-forced ones by the
//! [`Notification::AdministrativeAction`] entry that follows every forced
//! release and every revert.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::digest::ContentDigest;
use crate::identity::{Address, DisputeId};

/// Privileged ledger operations recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrativeOperation {
    /// Owner moved a locked deposit to the payee's released balance.
    ForceRelease,
    /// Owner returned a locked deposit to the payer.
    Revert,
}

impl AdministrativeOperation {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForceRelease => "force_release",
            Self::Revert => "revert",
        }
    }
}

impl std::fmt::Display for AdministrativeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification emitted by a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Notification {
    /// Funds locked for `payee` by payer `by`.
    DepositAdded {
        /// Recipient of the locked funds.
        payee: Address,
        /// Payer who supplied the funds.
        by: Address,
        /// Amount locked.
        amount: Amount,
    },
    /// Locked funds moved to the payee's released balance.
    DepositReleased {
        /// Payee credited.
        payee: Address,
        /// Payer whose lock was drawn down.
        from: Address,
        /// Amount released.
        amount: Amount,
    },
    /// Locked funds returned to the payer.
    DepositReverted {
        /// Payee whose lock was drawn down.
        payee: Address,
        /// Payer refunded.
        to: Address,
        /// Amount returned.
        amount: Amount,
    },
    /// Released balance paid out to the payee.
    DepositWithdrawn {
        /// Payee paid.
        payee: Address,
        /// Amount paid.
        amount: Amount,
    },
    /// Audit record for an owner-forced ledger operation.
    AdministrativeAction {
        /// Identity that exercised owner authority.
        operator: Address,
        /// Which privileged operation ran.
        operation: AdministrativeOperation,
        /// Payee of the affected lock.
        payee: Address,
        /// Payer of the affected lock.
        payer: Address,
        /// Amount moved.
        amount: Amount,
    },
    /// Identity added to the arbitrator set.
    ArbitratorAdded {
        /// New arbitrator.
        arbitrator: Address,
    },
    /// Identity removed from the arbitrator set.
    ArbitratorRemoved {
        /// Removed arbitrator.
        arbitrator: Address,
    },
    /// A new dispute was recorded.
    DisputeRaised {
        /// Assigned identifier.
        dispute_id: DisputeId,
        /// Target the dispute may be enforced against.
        arbitrable: Option<Address>,
        /// Raising party.
        claimant: Address,
        /// Opposing party.
        defendant: Address,
        /// Commitment to the reason.
        reason_hash: ContentDigest,
    },
    /// A dispute reached its terminal state.
    DisputeClosed {
        /// The dispute.
        dispute_id: DisputeId,
        /// Who closed it.
        author: Address,
    },
    /// The resolution commitment was replaced.
    DisputeResolutionSuggested {
        /// The dispute.
        dispute_id: DisputeId,
        /// Who suggested it.
        author: Address,
        /// New commitment.
        resolution_hash: ContentDigest,
    },
    /// The committed resolution was revealed and enacted.
    DisputeResolved {
        /// The dispute.
        dispute_id: DisputeId,
        /// Who resolved it.
        author: Address,
        /// The commitment that was honoured.
        resolution_hash: ContentDigest,
    },
    /// Owner authority changed hands.
    OwnershipTransferred {
        /// Former owner.
        previous_owner: Address,
        /// New owner.
        new_owner: Address,
    },
}

impl Notification {
    /// Short name of the notification, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DepositAdded { .. } => "DepositAdded",
            Self::DepositReleased { .. } => "DepositReleased",
            Self::DepositReverted { .. } => "DepositReverted",
            Self::DepositWithdrawn { .. } => "DepositWithdrawn",
            Self::AdministrativeAction { .. } => "AdministrativeAction",
            Self::ArbitratorAdded { .. } => "ArbitratorAdded",
            Self::ArbitratorRemoved { .. } => "ArbitratorRemoved",
            Self::DisputeRaised { .. } => "DisputeRaised",
            Self::DisputeClosed { .. } => "DisputeClosed",
            Self::DisputeResolutionSuggested { .. } => "DisputeResolutionSuggested",
            Self::DisputeResolved { .. } => "DisputeResolved",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

/// Ordered notifications emitted by one successful operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    notifications: Vec<Notification>,
}

impl Receipt {
    /// An empty receipt.
    pub fn new() -> Self {
        Self::default()
    }

    /// A receipt holding one notification.
    pub fn single(notification: Notification) -> Self {
        Self {
            notifications: vec![notification],
        }
    }

    /// Append a notification.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Append every notification from another receipt, preserving order.
    pub fn extend(&mut self, other: Receipt) {
        self.notifications.extend(other.notifications);
    }

    /// The notifications, in emission order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Names of the notifications, in emission order.
    pub fn names(&self) -> Vec<&'static str> {
        self.notifications.iter().map(Notification::name).collect()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// Whether the receipt is empty.
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

impl IntoIterator for Receipt {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.notifications.into_iter()
    }
}
