//! # Dispute Records
//!
//! A dispute is a recorded disagreement between a claimant and a
//! defendant, optionally tied to an arbitrable target the registry can
//! enforce a resolution on.

use arbiter_core::{Address, ContentDigest, DisputeId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::ArbitrationError;

// ── Dispute State ───────────────────────────────────────────────────────

/// Lifecycle state of a dispute.
///
/// ```text
/// Open ──close_dispute()────▶ Closed
///   │                           ▲
///   └──resolve_dispute()────────┘
/// ```
///
/// `Closed` is terminal. Records are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeState {
    /// Accepting suggestions, closure and resolution.
    Open,
    /// Closed by plain closure or by resolution. Terminal state.
    Closed,
}

impl DisputeState {
    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [DisputeState] {
        match self {
            Self::Open => &[Self::Closed],
            Self::Closed => &[],
        }
    }
}

impl std::fmt::Display for DisputeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── The Dispute ─────────────────────────────────────────────────────────

/// One dispute record.
///
/// ## Security Invariant
///
/// `resolution_hash` is the only field that changes while the dispute is
/// open, and `state` moves from `Open` to `Closed` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    /// Identifier, assigned once.
    pub id: DisputeId,
    /// Enforcement target; `None` for an informational dispute.
    pub arbitrable: Option<Address>,
    /// The raising party.
    pub claimant: Address,
    /// The opposing party.
    pub defendant: Address,
    /// Opaque commitment to the reason.
    pub reason_hash: ContentDigest,
    /// Commitment to the resolving action. `None` until one is suggested.
    pub resolution_hash: Option<ContentDigest>,
    /// When the dispute was raised.
    pub raised_at: Timestamp,
    /// Lifecycle state.
    pub state: DisputeState,
}

impl Dispute {
    /// Whether the dispute has reached its terminal state.
    pub fn is_closed(&self) -> bool {
        self.state.is_terminal()
    }

    pub(crate) fn require_open(&self) -> Result<(), ArbitrationError> {
        if self.is_closed() {
            Err(ArbitrationError::DisputeAlreadyClosed(self.id))
        } else {
            Ok(())
        }
    }

    pub(crate) fn close(&mut self) {
        self.state = DisputeState::Closed;
    }
}
