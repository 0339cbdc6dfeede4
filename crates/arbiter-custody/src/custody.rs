//! # Asset Custody Ledger
//!
//! Holds value for payees on behalf of payers. A deposit is locked under
//! its (payee, payer) key until the payer releases it, the owner forces a
//! release, or the owner reverts it back to the payer. Released value
//! accrues per payee until the payee withdraws it.
//!
//! ```text
//!           add_deposit              release_deposit / force_release
//! payer ───────────────▶ Locked(payee,payer) ─────────────────────▶ Released(payee)
//!   ▲                          │                                         │
//!   └──── revert_deposit ──────┘                        withdraw_deposit │
//!                                                                        ▼
//!                                                                      payee
//! ```
//!
//! ## Security Invariant
//!
//! Conservation: the value held by the transfer backend always equals the
//! sum of every locked and released entry. Each operation validates first,
//! moves value second, and only then mutates the ledger, so a failed
//! transfer leaves the ledger untouched.

use std::collections::BTreeMap;

use arbiter_core::{
    AccessControl, ActionRejected, AdministrativeOperation, Address, Amount, Arbitrable, Caller,
    Notification, Receipt, ResolutionAction,
};

use crate::config::CustodyConfig;
use crate::error::CustodyError;
use crate::transfer::{AccountBook, ValueTransfer};

/// A deposit custody ledger with its own owner and value backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCustody<T: ValueTransfer = AccountBook> {
    address: Address,
    access: AccessControl,
    /// Keyed by (payee, payer). Zero entries are removed.
    locked: BTreeMap<(Address, Address), Amount>,
    /// Keyed by payee. Zero entries are removed.
    released: BTreeMap<Address, Amount>,
    treasury: T,
}

impl AssetCustody<AccountBook> {
    /// Build a ledger with an empty in-memory [`AccountBook`].
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Access`] if either identity is null.
    pub fn from_config(config: &CustodyConfig) -> Result<Self, CustodyError> {
        Self::new(
            config.address,
            config.owner,
            AccountBook::for_custodian(config.address),
        )
    }
}

impl<T: ValueTransfer> AssetCustody<T> {
    /// Create an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Access`] with
    /// [`AccessError::InvalidAddress`](arbiter_core::AccessError::InvalidAddress)
    /// if `address` or `owner` is the null identity.
    pub fn new(address: Address, owner: Address, treasury: T) -> Result<Self, CustodyError> {
        if address.is_zero() {
            return Err(arbiter_core::AccessError::InvalidAddress.into());
        }
        Ok(Self {
            address,
            access: AccessControl::new(owner)?,
            locked: BTreeMap::new(),
            released: BTreeMap::new(),
            treasury,
        })
    }

    /// The ledger's own identity.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// The value backend.
    pub fn treasury(&self) -> &T {
        &self.treasury
    }

    /// Mutable access to the value backend, for funding accounts.
    pub fn treasury_mut(&mut self) -> &mut T {
        &mut self.treasury
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Amount locked for `payee` by `payer`.
    pub fn deposit_locked(&self, payee: Address, payer: Address) -> Amount {
        self.locked
            .get(&(payee, payer))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Amount released to `payee` and awaiting withdrawal.
    pub fn deposit_released(&self, payee: Address) -> Amount {
        self.released.get(&payee).copied().unwrap_or(Amount::ZERO)
    }

    /// Value held by the backend on behalf of this ledger.
    pub fn total_held(&self) -> Amount {
        self.treasury.held()
    }

    /// Sum of every locked and released entry, or `None` on overflow.
    pub fn ledger_total(&self) -> Option<Amount> {
        Amount::checked_sum(self.locked.values().chain(self.released.values()))
    }

    /// Whether held value equals the ledger total.
    pub fn is_conserved(&self) -> bool {
        self.ledger_total() == Some(self.total_held())
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Lock `amount` for `payee`, paid by the caller.
    ///
    /// # Errors
    ///
    /// [`CustodyError::ZeroAmount`], [`CustodyError::InvalidAddress`],
    /// [`CustodyError::CustodyAccount`] if the ledger itself is payer or
    /// payee, [`CustodyError::AmountOverflow`], or [`CustodyError::Transfer`]
    /// if the payer cannot fund the deposit.
    pub fn add_deposit(
        &mut self,
        caller: &Caller,
        payee: Address,
        amount: Amount,
    ) -> Result<Receipt, CustodyError> {
        let payer = caller.address();
        require_positive(amount)?;
        if payee.is_zero() {
            return Err(CustodyError::InvalidAddress);
        }
        self.require_external(payer)?;
        self.require_external(payee)?;
        let next = self
            .deposit_locked(payee, payer)
            .checked_add(amount)
            .ok_or(CustodyError::AmountOverflow { amount })?;

        self.treasury.collect(payer, amount)?;
        self.locked.insert((payee, payer), next);

        tracing::info!(payee = %payee, payer = %payer, amount = %amount, "deposit locked");
        Ok(Receipt::single(Notification::DepositAdded {
            payee,
            by: payer,
            amount,
        }))
    }

    /// Release part of the caller's lock for `payee` to the payee.
    ///
    /// # Errors
    ///
    /// [`CustodyError::ZeroAmount`], [`CustodyError::InsufficientLockedBalance`]
    /// or [`CustodyError::AmountOverflow`].
    pub fn release_deposit(
        &mut self,
        caller: &Caller,
        payee: Address,
        amount: Amount,
    ) -> Result<Receipt, CustodyError> {
        let payer = caller.address();
        self.move_to_released(payee, payer, amount)?;
        tracing::info!(payee = %payee, payer = %payer, amount = %amount, "deposit released");
        Ok(Receipt::single(Notification::DepositReleased {
            payee,
            from: payer,
            amount,
        }))
    }

    /// Owner-forced release of a (payee, payer) lock.
    ///
    /// Emits `DepositReleased` followed by an `AdministrativeAction` record.
    ///
    /// # Errors
    ///
    /// [`CustodyError::Access`] for a non-owner caller, otherwise as
    /// [`release_deposit`](Self::release_deposit).
    pub fn force_release_deposit(
        &mut self,
        caller: &Caller,
        payee: Address,
        payer: Address,
        amount: Amount,
    ) -> Result<Receipt, CustodyError> {
        self.access.require_owner(caller)?;
        self.move_to_released(payee, payer, amount)?;

        tracing::info!(
            operator = %caller,
            payee = %payee,
            payer = %payer,
            amount = %amount,
            "deposit force-released"
        );
        let mut receipt = Receipt::single(Notification::DepositReleased {
            payee,
            from: payer,
            amount,
        });
        receipt.push(Notification::AdministrativeAction {
            operator: caller.address(),
            operation: AdministrativeOperation::ForceRelease,
            payee,
            payer,
            amount,
        });
        Ok(receipt)
    }

    /// Owner-forced return of a (payee, payer) lock straight to the payer.
    ///
    /// Emits `DepositReverted` followed by an `AdministrativeAction` record.
    ///
    /// # Errors
    ///
    /// [`CustodyError::Access`], [`CustodyError::ZeroAmount`],
    /// [`CustodyError::InsufficientLockedBalance`], or
    /// [`CustodyError::Transfer`] if the payer refuses the refund.
    pub fn revert_deposit(
        &mut self,
        caller: &Caller,
        payee: Address,
        payer: Address,
        amount: Amount,
    ) -> Result<Receipt, CustodyError> {
        self.access.require_owner(caller)?;
        let remaining = self.draw_locked(payee, payer, amount)?;

        self.treasury.disburse(payer, amount)?;
        self.set_locked(payee, payer, remaining);

        tracing::info!(
            operator = %caller,
            payee = %payee,
            payer = %payer,
            amount = %amount,
            "deposit reverted"
        );
        let mut receipt = Receipt::single(Notification::DepositReverted {
            payee,
            to: payer,
            amount,
        });
        receipt.push(Notification::AdministrativeAction {
            operator: caller.address(),
            operation: AdministrativeOperation::Revert,
            payee,
            payer,
            amount,
        });
        Ok(receipt)
    }

    /// Pay the payee's entire released balance out and zero it.
    ///
    /// # Errors
    ///
    /// [`CustodyError::NotPayee`] unless the caller is `payee`,
    /// [`CustodyError::CustodyAccount`] if `payee` is the ledger itself,
    /// [`CustodyError::NothingToWithdraw`], or [`CustodyError::Transfer`]
    /// if the payee refuses the payment.
    pub fn withdraw_deposit(
        &mut self,
        caller: &Caller,
        payee: Address,
    ) -> Result<Receipt, CustodyError> {
        if caller.address() != payee {
            tracing::warn!(caller = %caller, payee = %payee, "withdrawal by non-payee rejected");
            return Err(CustodyError::NotPayee {
                caller: caller.address(),
                payee,
            });
        }
        self.require_external(payee)?;
        let amount = self.deposit_released(payee);
        if amount.is_zero() {
            return Err(CustodyError::NothingToWithdraw { payee });
        }

        self.treasury.disburse(payee, amount)?;
        self.released.remove(&payee);

        tracing::info!(payee = %payee, amount = %amount, "deposit withdrawn");
        Ok(Receipt::single(Notification::DepositWithdrawn { payee, amount }))
    }

    /// Hand owner authority to `new_owner`.
    ///
    /// # Errors
    ///
    /// [`CustodyError::Access`].
    pub fn transfer_ownership(
        &mut self,
        caller: &Caller,
        new_owner: Address,
    ) -> Result<Receipt, CustodyError> {
        let notification = self.access.transfer_ownership(caller, new_owner)?;
        Ok(Receipt::single(notification))
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_external(&self, party: Address) -> Result<(), CustodyError> {
        if party == self.address {
            tracing::warn!(custody = %self.address, "custody account named as its own party");
            return Err(CustodyError::CustodyAccount(party));
        }
        Ok(())
    }

    /// Validate drawing `amount` from a lock; returns the remainder.
    fn draw_locked(
        &self,
        payee: Address,
        payer: Address,
        amount: Amount,
    ) -> Result<Amount, CustodyError> {
        require_positive(amount)?;
        let available = self.deposit_locked(payee, payer);
        available
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientLockedBalance {
                payee,
                payer,
                requested: amount,
                available,
            })
    }

    fn move_to_released(
        &mut self,
        payee: Address,
        payer: Address,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let remaining = self.draw_locked(payee, payer, amount)?;
        let credited = self
            .deposit_released(payee)
            .checked_add(amount)
            .ok_or(CustodyError::AmountOverflow { amount })?;
        self.set_locked(payee, payer, remaining);
        self.released.insert(payee, credited);
        Ok(())
    }

    fn set_locked(&mut self, payee: Address, payer: Address, value: Amount) {
        if value.is_zero() {
            self.locked.remove(&(payee, payer));
        } else {
            self.locked.insert((payee, payer), value);
        }
    }
}

fn require_positive(amount: Amount) -> Result<(), CustodyError> {
    if amount.is_zero() {
        Err(CustodyError::ZeroAmount)
    } else {
        Ok(())
    }
}

// ── Arbitrable ──────────────────────────────────────────────────────────

impl<T: ValueTransfer> Arbitrable for AssetCustody<T> {
    fn address(&self) -> Address {
        self.address
    }

    fn enact(
        &mut self,
        caller: &Caller,
        action: &ResolutionAction,
    ) -> Result<Receipt, ActionRejected> {
        tracing::debug!(
            custody = %self.address,
            caller = %caller,
            action = action.kind(),
            "enacting resolution action"
        );
        let receipt = match action {
            ResolutionAction::NoAction => Receipt::new(),
            ResolutionAction::ForceReleaseDeposit {
                payee,
                payer,
                amount,
            } => self.force_release_deposit(caller, *payee, *payer, *amount)?,
            ResolutionAction::RevertDeposit {
                payee,
                payer,
                amount,
            } => self.revert_deposit(caller, *payee, *payer, *amount)?,
            ResolutionAction::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, *new_owner)?
            }
        };
        Ok(receipt)
    }
}
