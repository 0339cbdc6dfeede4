//! # Custody Errors
//!
//! Every variant aborts the operation before any balance moves.

use arbiter_core::{AccessError, ActionRejected, Address, Amount, ErrorKind};
use thiserror::Error;

/// Failure of the external value-transfer primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The sender cannot cover the amount.
    #[error("{account} holds {available}, cannot transfer {requested}")]
    InsufficientFunds {
        /// Account that was debited.
        account: Address,
        /// Amount requested.
        requested: Amount,
        /// Amount available.
        available: Amount,
    },

    /// The recipient does not accept incoming value.
    #[error("recipient {0} refused the transfer")]
    RecipientRefused(Address),

    /// Crediting the recipient would overflow its balance.
    #[error("crediting {0} would overflow its balance")]
    Overflow(Address),

    /// Source and destination are the same account.
    #[error("cannot transfer from {0} to itself")]
    SelfTransfer(Address),
}

impl TransferError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientFunds { .. } | Self::RecipientRefused(_) => ErrorKind::State,
            Self::Overflow(_) | Self::SelfTransfer(_) => ErrorKind::Validation,
        }
    }
}

/// Errors from [`AssetCustody`](crate::AssetCustody) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// Deposits, releases and reverts must move a positive amount.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// The null identity cannot be a payee.
    #[error("the null address cannot be a payee")]
    InvalidAddress,

    /// The ledger's own account cannot pay into or be paid out of itself.
    #[error("custody account {0} cannot be a payer or payee of its own ledger")]
    CustodyAccount(Address),

    /// Crediting a ledger entry would overflow.
    #[error("ledger entry overflow adding {amount}")]
    AmountOverflow {
        /// The amount that could not be credited.
        amount: Amount,
    },

    /// The locked entry for (payee, payer) does not cover the request.
    #[error("locked deposit for payee {payee} from {payer} is {available}, requested {requested}")]
    InsufficientLockedBalance {
        /// Payee of the lock.
        payee: Address,
        /// Payer of the lock.
        payer: Address,
        /// Amount requested.
        requested: Amount,
        /// Amount currently locked.
        available: Amount,
    },

    /// The payee has no released balance.
    #[error("payee {payee} has nothing to withdraw")]
    NothingToWithdraw {
        /// The payee.
        payee: Address,
    },

    /// Only the payee may withdraw its own released balance.
    #[error("caller {caller} cannot withdraw for payee {payee}")]
    NotPayee {
        /// The rejected caller.
        caller: Address,
        /// The payee named in the request.
        payee: Address,
    },

    /// Owner gate failure.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The value-transfer primitive could not complete.
    #[error("value transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl CustodyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroAmount
            | Self::InvalidAddress
            | Self::CustodyAccount(_)
            | Self::AmountOverflow { .. } => ErrorKind::Validation,
            Self::InsufficientLockedBalance { .. } | Self::NothingToWithdraw { .. } => {
                ErrorKind::State
            }
            Self::NotPayee { .. } => ErrorKind::Authorization,
            Self::Access(err) => err.kind(),
            Self::Transfer(err) => err.kind(),
        }
    }
}

impl From<CustodyError> for ActionRejected {
    fn from(err: CustodyError) -> Self {
        ActionRejected::new(err.kind(), err.to_string())
    }
}
