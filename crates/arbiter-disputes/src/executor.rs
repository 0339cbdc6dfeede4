//! # Delegated Execution
//!
//! Forwards a revealed resolution action to its arbitrable target, acting
//! with the registry's own identity as caller.
//!
//! The executor performs no authorization of its own. Passage through
//! [`DisputeRegistry::resolve_dispute`](crate::DisputeRegistry::resolve_dispute)
//! is the gate; whether the registry's identity carries any privilege on
//! the target is the target's decision, made beforehand (for a custody
//! ledger, by transferring ownership to the registry).

use arbiter_core::{
    ActionRejected, Address, ArbitrableLookup, Caller, DisputeId, ErrorKind, Receipt,
    ResolutionAction,
};

use crate::error::ArbitrationError;

/// Issues delegated calls on behalf of one authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegatedExecutor {
    authority: Address,
}

impl DelegatedExecutor {
    /// An executor presenting `authority` as the caller.
    pub fn new(authority: Address) -> Self {
        Self { authority }
    }

    /// The identity targets see as caller.
    pub fn authority(&self) -> Address {
        self.authority
    }

    /// Apply `action` to the target registered at `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::DelegatedCallFailed`] if `targets` has no
    /// entry for `target` or the target rejects the action. The target's
    /// state is unchanged in either case.
    pub fn forward(
        &self,
        dispute_id: DisputeId,
        target: Address,
        action: &ResolutionAction,
        targets: &mut dyn ArbitrableLookup,
    ) -> Result<Receipt, ArbitrationError> {
        let Some(arbitrable) = targets.resolve(target) else {
            tracing::warn!(
                dispute_id = %dispute_id,
                target = %target,
                "arbitrable target not reachable"
            );
            return Err(ArbitrationError::DelegatedCallFailed {
                dispute_id,
                target,
                source: ActionRejected::new(
                    ErrorKind::State,
                    format!("no arbitrable target registered at {target}"),
                ),
            });
        };

        tracing::info!(
            dispute_id = %dispute_id,
            target = %target,
            action = action.kind(),
            "forwarding resolution action"
        );
        arbitrable
            .enact(&Caller::authenticated(self.authority), action)
            .map_err(|source| {
                tracing::warn!(
                    dispute_id = %dispute_id,
                    target = %target,
                    kind = %source.kind,
                    reason = %source.reason,
                    "delegated call rejected"
                );
                ArbitrationError::DelegatedCallFailed {
                    dispute_id,
                    target,
                    source,
                }
            })
    }
}
