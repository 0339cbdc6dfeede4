//! # Temporal Types — UTC Timestamps and Clocks
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds, and the
//! [`Clock`] trait the dispute registry reads `raised_at` from.
//!
//! ## Security Invariant
//!
//! Timestamps are UTC with a `Z` suffix and seconds precision so canonical
//! encodings of records that carry them are deterministic. Clocks never
//! run backwards: [`SystemClock`] clamps to the last value it returned.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing or constructing a [`Timestamp`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Input did not end in `Z`.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NotUtc(String),

    /// Input was not RFC 3339.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Parser message.
        reason: String,
    },

    /// Epoch seconds outside the representable range.
    #[error("invalid Unix timestamp: {0}")]
    OutOfRange(i64),
}

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] for non-UTC offsets or malformed input.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::NotUtc(s.to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// From Unix epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::OutOfRange`] if `secs` is not representable.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or(TimestampError::OutOfRange(secs))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Source of wall-clock time that never goes backwards.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by the system time, clamped to be non-decreasing.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_secs: AtomicI64,
}

impl SystemClock {
    /// Create a system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let observed = Timestamp::now().epoch_secs();
        let previous = self.last_secs.fetch_max(observed, Ordering::SeqCst);
        let secs = previous.max(observed);
        Timestamp::from_epoch_secs(secs).unwrap_or_else(|_| Timestamp::now())
    }
}

/// A clock that only moves when told to. Used by tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    /// Start the clock at `start`.
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            secs: AtomicI64::new(start.epoch_secs()),
        }
    }

    /// Move forward by `secs` seconds. Negative values are ignored.
    pub fn advance(&self, secs: i64) {
        if secs > 0 {
            self.secs.fetch_add(secs, Ordering::SeqCst);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let secs = self.secs.load(Ordering::SeqCst);
        Timestamp::from_epoch_secs(secs).unwrap_or_else(|_| Timestamp::now())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
