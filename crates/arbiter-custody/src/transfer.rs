//! # Value Transfer
//!
//! Custody never mints or burns value. Every deposit is collected from the
//! payer through a [`ValueTransfer`] backend and every withdrawal or revert
//! is disbursed through the same backend, inside the same operation as the
//! ledger change it accompanies.
//!
//! [`AccountBook`] is the in-memory backend: external balances per address,
//! with the custodian's own account holding everything in custody.

use std::collections::{BTreeMap, BTreeSet};

use arbiter_core::{Address, Amount};

use crate::error::TransferError;

/// Atomic native value movement between custody and the outside world.
///
/// Both methods are all-or-nothing: on `Err` no balance has changed.
pub trait ValueTransfer {
    /// Move `amount` from `from` into custody.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError`] if `from` cannot cover the amount.
    fn collect(&mut self, from: Address, amount: Amount) -> Result<(), TransferError>;

    /// Move `amount` out of custody to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError`] if custody cannot cover the amount or `to`
    /// refuses it.
    fn disburse(&mut self, to: Address, amount: Amount) -> Result<(), TransferError>;

    /// Total value currently in custody.
    fn held(&self) -> Amount;
}

/// In-memory external balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBook {
    custodian: Address,
    balances: BTreeMap<Address, Amount>,
    refusing: BTreeSet<Address>,
}

impl AccountBook {
    /// An empty book whose custody account is `custodian`.
    pub fn for_custodian(custodian: Address) -> Self {
        Self {
            custodian,
            balances: BTreeMap::new(),
            refusing: BTreeSet::new(),
        }
    }

    /// The account holding custody funds.
    pub fn custodian(&self) -> Address {
        self.custodian
    }

    /// Credit `account` with freshly supplied value.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Overflow`] if the balance would overflow.
    pub fn fund(&mut self, account: Address, amount: Amount) -> Result<(), TransferError> {
        let next = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(TransferError::Overflow(account))?;
        self.balances.insert(account, next);
        Ok(())
    }

    /// Current balance of `account`.
    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Make `account` reject every incoming transfer.
    pub fn refuse_incoming(&mut self, account: Address) {
        self.refusing.insert(account);
    }

    /// Undo [`refuse_incoming`](Self::refuse_incoming).
    pub fn accept_incoming(&mut self, account: Address) {
        self.refusing.remove(&account);
    }

    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if from == to {
            return Err(TransferError::SelfTransfer(from));
        }
        if self.refusing.contains(&to) {
            return Err(TransferError::RecipientRefused(to));
        }
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds {
                account: from,
                requested: amount,
                available,
            })?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow(to))?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }
}

impl ValueTransfer for AccountBook {
    fn collect(&mut self, from: Address, amount: Amount) -> Result<(), TransferError> {
        self.transfer(from, self.custodian, amount)
    }

    fn disburse(&mut self, to: Address, amount: Amount) -> Result<(), TransferError> {
        self.transfer(self.custodian, to, amount)
    }

    fn held(&self) -> Amount {
        self.balance_of(self.custodian)
    }
}
