//! # arbiter-disputes — Dispute Registry and Delegated Enforcement
//!
//! - **Registry** ([`registry`]): `DisputeRegistry` holding the arbitrator
//!   set and the dispute table, with raise, suggest, close and
//!   commit-reveal resolve.
//! - **Records** ([`dispute`]): the `Dispute` record and its two-state
//!   lifecycle.
//! - **Enforcement** ([`executor`]): `DelegatedExecutor`, which forwards a
//!   verified resolution to its arbitrable target under the registry's
//!   identity.
//! - **Configuration** ([`config`]): `RegistryConfig` from YAML.
//!
//! This crate does not depend on any concrete target. Targets implement
//! [`arbiter_core::Arbitrable`] and are handed to
//! [`DisputeRegistry::resolve_dispute`] through an
//! [`arbiter_core::ArbitrableLookup`].

pub mod config;
pub mod dispute;
pub mod error;
pub mod executor;
pub mod registry;

pub use config::{ConfigError, RegistryConfig};
pub use dispute::{Dispute, DisputeState};
pub use error::ArbitrationError;
pub use executor::DelegatedExecutor;
pub use registry::DisputeRegistry;
