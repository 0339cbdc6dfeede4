//! # Access Control
//!
//! A single transferable owner identity gating privileged operations.
//! Composed by value into each component at construction; there is no
//! process-wide owner.

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::identity::{Address, Caller};
use crate::notification::Notification;

/// The owner gate of one component instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
}

impl AccessControl {
    /// Create the gate with its initial owner.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidAddress`] if `owner` is the null identity.
    pub fn new(owner: Address) -> Result<Self, AccessError> {
        if owner.is_zero() {
            return Err(AccessError::InvalidAddress);
        }
        Ok(Self { owner })
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether `caller` is the current owner.
    pub fn is_owner(&self, caller: &Caller) -> bool {
        caller.address() == self.owner
    }

    /// Fail unless `caller` is the current owner.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotOwner`].
    pub fn require_owner(&self, caller: &Caller) -> Result<(), AccessError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, owner = %self.owner, "owner-only operation rejected");
            Err(AccessError::NotOwner {
                caller: caller.address(),
            })
        }
    }

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotOwner`] if `caller` is not the owner, or
    /// [`AccessError::InvalidAddress`] if `new_owner` is the null identity.
    pub fn transfer_ownership(
        &mut self,
        caller: &Caller,
        new_owner: Address,
    ) -> Result<Notification, AccessError> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(AccessError::InvalidAddress);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        tracing::info!(previous = %previous_owner, new = %new_owner, "ownership transferred");
        Ok(Notification::OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }
}
