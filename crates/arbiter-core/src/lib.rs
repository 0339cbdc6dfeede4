//! # arbiter-core — Foundational Types for the Arbiter Stack
//!
//! The leaf crate of the workspace. It defines the primitives the custody
//! ledger and the dispute registry share, so that neither depends on the
//! other:
//!
//! - **Identities** ([`identity`]): `Address`, the authenticated `Caller`
//!   token, and `DisputeId`.
//! - **Amounts** ([`amount`]): checked, string-serialized `Amount`.
//! - **Canonical bytes and digests** ([`canonical`], [`digest`]): the only
//!   path from a value to a commitment.
//! - **Time** ([`temporal`]): UTC `Timestamp` and monotonic `Clock`s.
//! - **Access control** ([`access`]): the transferable owner gate.
//! - **Notifications** ([`notification`]): what operations emit, collected
//!   into a `Receipt`.
//! - **Actions** ([`action`]): `ResolutionAction` and the `Arbitrable`
//!   capability a dispute registry enforces through.
//! - **Serialization point** ([`serial`]): `SerialExecutor`.
//! - **Errors** ([`error`]): shared error types and `ErrorKind`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `arbiter-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod access;
pub mod action;
pub mod amount;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod notification;
pub mod serial;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use access::AccessControl;
pub use action::{Arbitrable, ArbitrableLookup, NoArbitrables, ResolutionAction};
pub use amount::Amount;
pub use canonical::CanonicalBytes;
pub use digest::{digest_of, sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{AccessError, ActionRejected, CanonicalizationError, ErrorKind, HexError};
pub use identity::{Address, Caller, DisputeId};
pub use notification::{AdministrativeOperation, Notification, Receipt};
pub use serial::{SerialExecutor, Sequenced};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp, TimestampError};
