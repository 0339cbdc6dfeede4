//! # arbiter-custody — Deposit Custody Ledger
//!
//! A neutral ledger holding value for payees on behalf of payers, with
//! deferred release:
//!
//! - **Ledger** ([`custody`]): `AssetCustody` with payer release,
//!   owner-forced release, owner revert, and payee withdrawal.
//! - **Value movement** ([`transfer`]): the `ValueTransfer` primitive and
//!   the in-memory `AccountBook`.
//! - **Configuration** ([`config`]): `CustodyConfig` from YAML.
//!
//! `AssetCustody` implements [`arbiter_core::Arbitrable`], so a dispute
//! registry that has been made its owner can enforce resolutions on it.

pub mod config;
pub mod custody;
pub mod error;
pub mod transfer;

pub use config::{ConfigError, CustodyConfig};
pub use custody::AssetCustody;
pub use error::{CustodyError, TransferError};
pub use transfer::{AccountBook, ValueTransfer};
