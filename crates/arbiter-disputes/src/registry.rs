//! # Dispute Registry
//!
//! Holds the arbitrator set and every dispute record, and drives the
//! dispute lifecycle:
//!
//! | Operation | Accepted callers |
//! |---|---|
//! | `add_arbitrators` / `remove_arbitrators` | owner |
//! | `raise_dispute` | anyone (becomes claimant) |
//! | `close_dispute` | claimant, any arbitrator |
//! | `suggest_dispute_resolution` | claimant, any arbitrator |
//! | `resolve_dispute` | defendant, any arbitrator |
//!
//! ## Security Invariant
//!
//! Commit-reveal: a dispute is resolved only by revealing the exact
//! [`ResolutionAction`] whose commitment is stored on the record. The check
//! applies to arbitrators too. The digest is computed through
//! [`ResolutionAction::commitment`], the same path the committer uses.
//!
//! Resolution is all-or-nothing: every check runs before the target is
//! touched, the target applies the action atomically, and the record is
//! closed only after the target succeeds.

use std::collections::{BTreeMap, BTreeSet};

use arbiter_core::{
    AccessControl, Address, ArbitrableLookup, Caller, Clock, ContentDigest, DisputeId,
    Notification, Receipt, ResolutionAction, SystemClock, Timestamp,
};

use crate::config::RegistryConfig;
use crate::dispute::{Dispute, DisputeState};
use crate::error::ArbitrationError;
use crate::executor::DelegatedExecutor;

/// Roles a caller can hold with respect to one dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Standing {
    ClaimantOrArbitrator,
    DefendantOrArbitrator,
}

impl Standing {
    fn describe(self) -> &'static str {
        match self {
            Self::ClaimantOrArbitrator => "claimant or arbitrator",
            Self::DefendantOrArbitrator => "defendant or arbitrator",
        }
    }
}

/// Arbitrator set and dispute table of one registry instance.
#[derive(Debug)]
pub struct DisputeRegistry<C: Clock = SystemClock> {
    address: Address,
    access: AccessControl,
    arbitrators: BTreeSet<Address>,
    disputes: BTreeMap<DisputeId, Dispute>,
    last_id: u64,
    allow_self_dispute: bool,
    clock: C,
}

impl<C: Clock> DisputeRegistry<C> {
    /// Create a registry with an initial arbitrator set.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::InvalidAddress`] if `address` or any arbitrator
    /// is null, [`ArbitrationError::Access`] if `owner` is null.
    pub fn new(
        address: Address,
        owner: Address,
        arbitrators: impl IntoIterator<Item = Address>,
        clock: C,
    ) -> Result<Self, ArbitrationError> {
        if address.is_zero() {
            return Err(ArbitrationError::InvalidAddress("registry address"));
        }
        let access = AccessControl::new(owner)?;
        let arbitrators: BTreeSet<Address> = arbitrators.into_iter().collect();
        if arbitrators.contains(&Address::ZERO) {
            return Err(ArbitrationError::InvalidAddress("arbitrator"));
        }
        Ok(Self {
            address,
            access,
            arbitrators,
            disputes: BTreeMap::new(),
            last_id: 0,
            allow_self_dispute: false,
            clock,
        })
    }

    /// Build a registry from a validated configuration.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn from_config(config: &RegistryConfig, clock: C) -> Result<Self, ArbitrationError> {
        let mut registry = Self::new(
            config.address,
            config.owner,
            config.arbitrators.iter().copied(),
            clock,
        )?;
        registry.allow_self_dispute = config.allow_self_dispute;
        Ok(registry)
    }

    /// Accept or reject disputes whose claimant is also the defendant.
    pub fn with_self_disputes(mut self, allow: bool) -> Self {
        self.allow_self_dispute = allow;
        self
    }

    // ── Identity & ownership ────────────────────────────────────────────

    /// The registry's own identity, presented as caller to targets.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Hand owner authority to `new_owner`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Access`].
    pub fn transfer_ownership(
        &mut self,
        caller: &Caller,
        new_owner: Address,
    ) -> Result<Receipt, ArbitrationError> {
        let notification = self.access.transfer_ownership(caller, new_owner)?;
        Ok(Receipt::single(notification))
    }

    // ── Arbitrator set ──────────────────────────────────────────────────

    /// Whether `address` is currently an arbitrator.
    pub fn is_arbitrator(&self, address: Address) -> bool {
        self.arbitrators.contains(&address)
    }

    /// Current arbitrators in address order.
    pub fn arbitrators(&self) -> impl Iterator<Item = Address> + '_ {
        self.arbitrators.iter().copied()
    }

    /// Add each of `candidates` to the arbitrator set.
    ///
    /// Idempotent: the receipt lists `ArbitratorAdded` only for members
    /// that were not already present.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Access`] for a non-owner caller,
    /// [`ArbitrationError::InvalidAddress`] if any candidate is null.
    pub fn add_arbitrators(
        &mut self,
        caller: &Caller,
        candidates: &[Address],
    ) -> Result<Receipt, ArbitrationError> {
        self.access.require_owner(caller)?;
        if candidates.iter().any(Address::is_zero) {
            return Err(ArbitrationError::InvalidAddress("arbitrator"));
        }
        let mut receipt = Receipt::new();
        for &arbitrator in candidates {
            if self.arbitrators.insert(arbitrator) {
                tracing::info!(arbitrator = %arbitrator, "arbitrator added");
                receipt.push(Notification::ArbitratorAdded { arbitrator });
            }
        }
        Ok(receipt)
    }

    /// Remove each of `members` from the arbitrator set.
    ///
    /// Idempotent: the receipt lists `ArbitratorRemoved` only for members
    /// that were present.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Access`] for a non-owner caller.
    pub fn remove_arbitrators(
        &mut self,
        caller: &Caller,
        members: &[Address],
    ) -> Result<Receipt, ArbitrationError> {
        self.access.require_owner(caller)?;
        let mut receipt = Receipt::new();
        for &arbitrator in members {
            if self.arbitrators.remove(&arbitrator) {
                tracing::info!(arbitrator = %arbitrator, "arbitrator removed");
                receipt.push(Notification::ArbitratorRemoved { arbitrator });
            }
        }
        Ok(receipt)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Id of the most recently raised dispute; 0 when none exist.
    pub fn disputes_count(&self) -> u64 {
        self.last_id
    }

    /// The full record for `id`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`].
    pub fn dispute(&self, id: DisputeId) -> Result<&Dispute, ArbitrationError> {
        self.disputes
            .get(&id)
            .ok_or(ArbitrationError::DisputeNotFound(id))
    }

    /// Claimant of dispute `id`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`].
    pub fn dispute_claimant(&self, id: DisputeId) -> Result<Address, ArbitrationError> {
        Ok(self.dispute(id)?.claimant)
    }

    /// Defendant of dispute `id`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`].
    pub fn dispute_defendant(&self, id: DisputeId) -> Result<Address, ArbitrationError> {
        Ok(self.dispute(id)?.defendant)
    }

    /// Arbitrable target of dispute `id`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`].
    pub fn dispute_arbitrable(&self, id: DisputeId) -> Result<Option<Address>, ArbitrationError> {
        Ok(self.dispute(id)?.arbitrable)
    }

    /// When dispute `id` was raised.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`].
    pub fn dispute_raised_at(&self, id: DisputeId) -> Result<Timestamp, ArbitrationError> {
        Ok(self.dispute(id)?.raised_at)
    }

    /// Current resolution commitment of dispute `id`.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`].
    pub fn dispute_resolution_hash(
        &self,
        id: DisputeId,
    ) -> Result<Option<ContentDigest>, ArbitrationError> {
        Ok(self.dispute(id)?.resolution_hash.clone())
    }

    /// Whether dispute `id` is closed.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`].
    pub fn dispute_is_closed(&self, id: DisputeId) -> Result<bool, ArbitrationError> {
        Ok(self.dispute(id)?.is_closed())
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Record a new dispute with the caller as claimant.
    ///
    /// `arbitrable` is the target a resolution may be enforced on; `None`
    /// records an informational dispute. `resolution_hash` is the initial
    /// commitment, if the claimant already has one.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::InvalidAddress`] for a null defendant or target,
    /// [`ArbitrationError::SelfDispute`] when claimant and defendant match
    /// and self-disputes are not allowed.
    pub fn raise_dispute(
        &mut self,
        caller: &Caller,
        arbitrable: Option<Address>,
        defendant: Address,
        reason_hash: ContentDigest,
        resolution_hash: Option<ContentDigest>,
    ) -> Result<(DisputeId, Receipt), ArbitrationError> {
        let claimant = caller.address();
        if defendant.is_zero() {
            return Err(ArbitrationError::InvalidAddress("defendant"));
        }
        if arbitrable.is_some_and(|target| target.is_zero()) {
            return Err(ArbitrationError::InvalidAddress("arbitrable"));
        }
        if claimant == defendant && !self.allow_self_dispute {
            return Err(ArbitrationError::SelfDispute(claimant));
        }
        let next = self
            .last_id
            .checked_add(1)
            .ok_or(ArbitrationError::IdSpaceExhausted)?;

        let id = DisputeId::new(next);
        let dispute = Dispute {
            id,
            arbitrable,
            claimant,
            defendant,
            reason_hash: reason_hash.clone(),
            resolution_hash,
            raised_at: self.clock.now(),
            state: DisputeState::Open,
        };
        self.disputes.insert(id, dispute);
        self.last_id = next;

        tracing::info!(
            dispute_id = %id,
            claimant = %claimant,
            defendant = %defendant,
            arbitrable = ?arbitrable,
            "dispute raised"
        );
        let receipt = Receipt::single(Notification::DisputeRaised {
            dispute_id: id,
            arbitrable,
            claimant,
            defendant,
            reason_hash,
        });
        Ok((id, receipt))
    }

    /// Close dispute `id` without enforcing anything.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`],
    /// [`ArbitrationError::DisputeAlreadyClosed`], or
    /// [`ArbitrationError::NotAuthorized`] for the defendant or a stranger.
    pub fn close_dispute(
        &mut self,
        caller: &Caller,
        id: DisputeId,
    ) -> Result<Receipt, ArbitrationError> {
        self.check_open_with_standing(caller, id, Standing::ClaimantOrArbitrator, "close")?;
        self.close_record(id)?;

        tracing::info!(dispute_id = %id, author = %caller, "dispute closed");
        Ok(Receipt::single(Notification::DisputeClosed {
            dispute_id: id,
            author: caller.address(),
        }))
    }

    /// Replace the resolution commitment of dispute `id`.
    ///
    /// # Errors
    ///
    /// As [`close_dispute`](Self::close_dispute).
    pub fn suggest_dispute_resolution(
        &mut self,
        caller: &Caller,
        id: DisputeId,
        resolution_hash: ContentDigest,
    ) -> Result<Receipt, ArbitrationError> {
        self.check_open_with_standing(
            caller,
            id,
            Standing::ClaimantOrArbitrator,
            "suggest a resolution for",
        )?;
        let dispute = self
            .disputes
            .get_mut(&id)
            .ok_or(ArbitrationError::DisputeNotFound(id))?;
        dispute.resolution_hash = Some(resolution_hash.clone());

        tracing::info!(
            dispute_id = %id,
            author = %caller,
            resolution_hash = %resolution_hash,
            "resolution suggested"
        );
        Ok(Receipt::single(Notification::DisputeResolutionSuggested {
            dispute_id: id,
            author: caller.address(),
            resolution_hash,
        }))
    }

    /// Reveal the committed action for dispute `id`, enforce it on the
    /// dispute's arbitrable target, and close the dispute.
    ///
    /// The receipt lists the target's notifications, then
    /// `DisputeResolved`, then `DisputeClosed`. A `NoAction` reveal closes
    /// the dispute without calling the target.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::DisputeNotFound`],
    /// [`ArbitrationError::DisputeAlreadyClosed`],
    /// [`ArbitrationError::NotAuthorized`] for the claimant or a stranger,
    /// [`ArbitrationError::NoResolutionCommitted`],
    /// [`ArbitrationError::ResolutionHashMismatch`], or
    /// [`ArbitrationError::DelegatedCallFailed`]. On any error the dispute
    /// stays open and the target is unchanged.
    pub fn resolve_dispute(
        &mut self,
        caller: &Caller,
        id: DisputeId,
        action: &ResolutionAction,
        targets: &mut dyn ArbitrableLookup,
    ) -> Result<Receipt, ArbitrationError> {
        let dispute =
            self.check_open_with_standing(caller, id, Standing::DefendantOrArbitrator, "resolve")?;
        let committed = dispute
            .resolution_hash
            .clone()
            .ok_or(ArbitrationError::NoResolutionCommitted(id))?;
        let revealed = action.commitment()?;
        tracing::debug!(
            dispute_id = %id,
            committed = %committed,
            revealed = %revealed,
            "checking resolution reveal"
        );
        if revealed != committed {
            tracing::warn!(
                dispute_id = %id,
                author = %caller,
                "revealed resolution does not match commitment"
            );
            return Err(ArbitrationError::ResolutionHashMismatch {
                dispute_id: id,
                expected: committed,
                revealed,
            });
        }

        let mut receipt = match (dispute.arbitrable, action) {
            (Some(target), action) if *action != ResolutionAction::NoAction => {
                DelegatedExecutor::new(self.address).forward(id, target, action, targets)?
            }
            _ => Receipt::new(),
        };
        self.close_record(id)?;

        tracing::info!(
            dispute_id = %id,
            author = %caller,
            action = action.kind(),
            "dispute resolved"
        );
        receipt.push(Notification::DisputeResolved {
            dispute_id: id,
            author: caller.address(),
            resolution_hash: committed,
        });
        receipt.push(Notification::DisputeClosed {
            dispute_id: id,
            author: caller.address(),
        });
        Ok(receipt)
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Existence, then open state, then caller standing.
    fn check_open_with_standing(
        &self,
        caller: &Caller,
        id: DisputeId,
        standing: Standing,
        operation: &'static str,
    ) -> Result<&Dispute, ArbitrationError> {
        let dispute = self.dispute(id)?;
        dispute.require_open()?;
        let who = caller.address();
        let party = match standing {
            Standing::ClaimantOrArbitrator => dispute.claimant,
            Standing::DefendantOrArbitrator => dispute.defendant,
        };
        if who == party || self.is_arbitrator(who) {
            return Ok(dispute);
        }
        tracing::warn!(dispute_id = %id, caller = %caller, operation, "dispute operation rejected");
        Err(ArbitrationError::NotAuthorized {
            caller: who,
            dispute_id: id,
            operation,
            required: standing.describe(),
        })
    }

    fn close_record(&mut self, id: DisputeId) -> Result<(), ArbitrationError> {
        let dispute = self
            .disputes
            .get_mut(&id)
            .ok_or(ArbitrationError::DisputeNotFound(id))?;
        dispute.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::{
        digest_of, ActionRejected, Amount, Arbitrable, ErrorKind, ManualClock, NoArbitrables,
    };

    const OWNER: u8 = 0xA0;
    const REGISTRY: u8 = 0xD0;
    const ARBITRATOR: u8 = 0xB1;
    const CLAIMANT: u8 = 1;
    const DEFENDANT: u8 = 2;
    const STRANGER: u8 = 9;
    const TARGET: u8 = 0xC0;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn who(n: u8) -> Caller {
        Caller::authenticated(addr(n))
    }

    fn reason() -> ContentDigest {
        digest_of(&"goods not delivered").unwrap()
    }

    fn registry() -> DisputeRegistry<ManualClock> {
        DisputeRegistry::new(
            addr(REGISTRY),
            addr(OWNER),
            [addr(ARBITRATOR)],
            ManualClock::starting_at(Timestamp::from_epoch_secs(1_700_000_000).unwrap()),
        )
        .unwrap()
    }

    fn release_action() -> ResolutionAction {
        ResolutionAction::ForceReleaseDeposit {
            payee: addr(CLAIMANT),
            payer: addr(DEFENDANT),
            amount: Amount::new(1_000),
        }
    }

    /// Applies any action from the registry's identity; records what it saw.
    struct Target {
        at: Address,
        accepts_from: Address,
        applied: Vec<ResolutionAction>,
    }

    impl Arbitrable for Target {
        fn address(&self) -> Address {
            self.at
        }

        fn enact(
            &mut self,
            caller: &Caller,
            action: &ResolutionAction,
        ) -> Result<Receipt, ActionRejected> {
            if caller.address() != self.accepts_from {
                return Err(ActionRejected::new(ErrorKind::Authorization, "not owner"));
            }
            self.applied.push(action.clone());
            Ok(Receipt::single(Notification::OwnershipTransferred {
                previous_owner: caller.address(),
                new_owner: caller.address(),
            }))
        }
    }

    fn target() -> Target {
        Target {
            at: addr(TARGET),
            accepts_from: addr(REGISTRY),
            applied: Vec::new(),
        }
    }

    fn raise_with(reg: &mut DisputeRegistry<ManualClock>, action: &ResolutionAction) -> DisputeId {
        reg.raise_dispute(
            &who(CLAIMANT),
            Some(addr(TARGET)),
            addr(DEFENDANT),
            reason(),
            Some(action.commitment().unwrap()),
        )
        .unwrap()
        .0
    }

    // ── Arbitrators ─────────────────────────────────────────────────────

    #[test]
    fn initial_arbitrators_are_installed() {
        let reg = registry();
        assert!(reg.is_arbitrator(addr(ARBITRATOR)));
        assert!(!reg.is_arbitrator(addr(STRANGER)));
        assert_eq!(reg.arbitrators().collect::<Vec<_>>(), vec![addr(ARBITRATOR)]);
    }

    #[test]
    fn arbitrator_changes_are_idempotent() {
        let mut reg = registry();
        let receipt = reg
            .add_arbitrators(&who(OWNER), &[addr(ARBITRATOR), addr(0xB2), addr(0xB2)])
            .unwrap();
        assert_eq!(
            receipt.notifications(),
            &[Notification::ArbitratorAdded {
                arbitrator: addr(0xB2)
            }]
        );
        let receipt = reg
            .remove_arbitrators(&who(OWNER), &[addr(0xB2), addr(STRANGER)])
            .unwrap();
        assert_eq!(receipt.names(), vec!["ArbitratorRemoved"]);
        assert!(!reg.is_arbitrator(addr(0xB2)));
    }

    #[test]
    fn arbitrator_set_is_owner_only() {
        let mut reg = registry();
        let err = reg
            .add_arbitrators(&who(ARBITRATOR), &[addr(STRANGER)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        let err = reg
            .remove_arbitrators(&who(STRANGER), &[addr(ARBITRATOR)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(reg.is_arbitrator(addr(ARBITRATOR)));
        assert!(!reg.is_arbitrator(addr(STRANGER)));
    }

    #[test]
    fn null_arbitrator_is_rejected() {
        let mut reg = registry();
        assert!(matches!(
            reg.add_arbitrators(&who(OWNER), &[addr(0xB2), Address::ZERO]),
            Err(ArbitrationError::InvalidAddress(_))
        ));
        assert!(!reg.is_arbitrator(addr(0xB2)));
    }

    // ── Raising ─────────────────────────────────────────────────────────

    #[test]
    fn ids_increase_from_one_regardless_of_caller() {
        let mut reg = registry();
        assert_eq!(reg.disputes_count(), 0);
        let callers = [CLAIMANT, STRANGER, ARBITRATOR];
        for (i, c) in callers.iter().enumerate() {
            let (id, receipt) = reg
                .raise_dispute(&who(*c), None, addr(DEFENDANT), reason(), None)
                .unwrap();
            assert_eq!(id, DisputeId::new(i as u64 + 1));
            assert_eq!(receipt.names(), vec!["DisputeRaised"]);
        }
        assert_eq!(reg.disputes_count(), 3);
    }

    #[test]
    fn raised_record_is_readable() {
        let mut reg = registry();
        let commitment = release_action().commitment().unwrap();
        let (id, receipt) = reg
            .raise_dispute(
                &who(CLAIMANT),
                Some(addr(TARGET)),
                addr(DEFENDANT),
                reason(),
                Some(commitment.clone()),
            )
            .unwrap();
        assert_eq!(
            receipt.notifications(),
            &[Notification::DisputeRaised {
                dispute_id: id,
                arbitrable: Some(addr(TARGET)),
                claimant: addr(CLAIMANT),
                defendant: addr(DEFENDANT),
                reason_hash: reason(),
            }]
        );
        assert_eq!(reg.dispute_claimant(id).unwrap(), addr(CLAIMANT));
        assert_eq!(reg.dispute_defendant(id).unwrap(), addr(DEFENDANT));
        assert_eq!(reg.dispute_arbitrable(id).unwrap(), Some(addr(TARGET)));
        assert_eq!(reg.dispute_resolution_hash(id).unwrap(), Some(commitment));
        assert_eq!(reg.dispute_raised_at(id).unwrap().epoch_secs(), 1_700_000_000);
        assert!(!reg.dispute_is_closed(id).unwrap());
    }

    #[test]
    fn raised_at_follows_the_clock() {
        let mut reg = registry();
        let (first, _) = reg
            .raise_dispute(&who(CLAIMANT), None, addr(DEFENDANT), reason(), None)
            .unwrap();
        reg.clock.advance(60);
        let (second, _) = reg
            .raise_dispute(&who(CLAIMANT), None, addr(DEFENDANT), reason(), None)
            .unwrap();
        assert_eq!(
            reg.dispute_raised_at(second).unwrap().epoch_secs()
                - reg.dispute_raised_at(first).unwrap().epoch_secs(),
            60
        );
    }

    #[test]
    fn self_dispute_rejected_unless_allowed() {
        let mut reg = registry();
        let err = reg
            .raise_dispute(&who(CLAIMANT), None, addr(CLAIMANT), reason(), None)
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::SelfDispute(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(reg.disputes_count(), 0);

        let mut reg = registry().with_self_disputes(true);
        assert!(reg
            .raise_dispute(&who(CLAIMANT), None, addr(CLAIMANT), reason(), None)
            .is_ok());
    }

    #[test]
    fn null_defendant_or_target_rejected() {
        let mut reg = registry();
        assert!(matches!(
            reg.raise_dispute(&who(CLAIMANT), None, Address::ZERO, reason(), None),
            Err(ArbitrationError::InvalidAddress("defendant"))
        ));
        assert!(matches!(
            reg.raise_dispute(
                &who(CLAIMANT),
                Some(Address::ZERO),
                addr(DEFENDANT),
                reason(),
                None
            ),
            Err(ArbitrationError::InvalidAddress("arbitrable"))
        ));
        assert_eq!(reg.disputes_count(), 0);
    }

    // ── Closing & suggesting ────────────────────────────────────────────

    #[test]
    fn claimant_and_arbitrator_may_close() {
        for closer in [CLAIMANT, ARBITRATOR] {
            let mut reg = registry();
            let id = raise_with(&mut reg, &release_action());
            let receipt = reg.close_dispute(&who(closer), id).unwrap();
            assert_eq!(
                receipt.notifications(),
                &[Notification::DisputeClosed {
                    dispute_id: id,
                    author: addr(closer),
                }]
            );
            assert!(reg.dispute_is_closed(id).unwrap());
        }
    }

    #[test]
    fn defendant_may_not_close_or_suggest() {
        let mut reg = registry();
        let id = raise_with(&mut reg, &release_action());
        let err = reg.close_dispute(&who(DEFENDANT), id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        let err = reg
            .suggest_dispute_resolution(&who(DEFENDANT), id, reason())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(!reg.dispute_is_closed(id).unwrap());
        assert_eq!(
            reg.dispute_resolution_hash(id).unwrap(),
            Some(release_action().commitment().unwrap())
        );
    }

    #[test]
    fn suggestion_overwrites_commitment() {
        let mut reg = registry();
        let id = raise_with(&mut reg, &release_action());
        let replacement = ResolutionAction::NoAction.commitment().unwrap();
        let receipt = reg
            .suggest_dispute_resolution(&who(ARBITRATOR), id, replacement.clone())
            .unwrap();
        assert_eq!(
            receipt.notifications(),
            &[Notification::DisputeResolutionSuggested {
                dispute_id: id,
                author: addr(ARBITRATOR),
                resolution_hash: replacement.clone(),
            }]
        );
        assert_eq!(reg.dispute_resolution_hash(id).unwrap(), Some(replacement));
    }

    #[test]
    fn unknown_dispute_is_not_found() {
        let mut reg = registry();
        let id = DisputeId::new(42);
        assert!(matches!(
            reg.close_dispute(&who(ARBITRATOR), id),
            Err(ArbitrationError::DisputeNotFound(_))
        ));
        assert_eq!(reg.dispute(id).unwrap_err().kind(), ErrorKind::State);
        assert!(reg.dispute_claimant(id).is_err());
    }

    #[test]
    fn closed_dispute_rejects_everything() {
        let mut reg = registry();
        let mut t = target();
        let id = raise_with(&mut reg, &release_action());
        reg.close_dispute(&who(CLAIMANT), id).unwrap();

        for caller in [CLAIMANT, DEFENDANT, ARBITRATOR] {
            assert!(matches!(
                reg.close_dispute(&who(caller), id),
                Err(ArbitrationError::DisputeAlreadyClosed(_))
            ));
            assert!(matches!(
                reg.suggest_dispute_resolution(&who(caller), id, reason()),
                Err(ArbitrationError::DisputeAlreadyClosed(_))
            ));
            let err = reg
                .resolve_dispute(&who(caller), id, &release_action(), &mut t)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::State);
        }
        assert!(t.applied.is_empty());
    }

    // ── Resolving ───────────────────────────────────────────────────────

    #[test]
    fn defendant_resolves_with_matching_reveal() {
        let mut reg = registry();
        let mut t = target();
        let id = raise_with(&mut reg, &release_action());
        let receipt = reg
            .resolve_dispute(&who(DEFENDANT), id, &release_action(), &mut t)
            .unwrap();
        assert_eq!(
            receipt.names(),
            vec!["OwnershipTransferred", "DisputeResolved", "DisputeClosed"]
        );
        assert_eq!(
            receipt.notifications()[1],
            Notification::DisputeResolved {
                dispute_id: id,
                author: addr(DEFENDANT),
                resolution_hash: release_action().commitment().unwrap(),
            }
        );
        assert_eq!(t.applied, vec![release_action()]);
        assert!(reg.dispute_is_closed(id).unwrap());
    }

    #[test]
    fn arbitrator_must_also_match_the_commitment() {
        let mut reg = registry();
        let mut t = target();
        let id = raise_with(&mut reg, &release_action());
        let other = ResolutionAction::RevertDeposit {
            payee: addr(CLAIMANT),
            payer: addr(DEFENDANT),
            amount: Amount::new(1_000),
        };
        let err = reg
            .resolve_dispute(&who(ARBITRATOR), id, &other, &mut t)
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::ResolutionHashMismatch { .. }));
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(!reg.dispute_is_closed(id).unwrap());
        assert!(t.applied.is_empty());

        assert!(reg
            .resolve_dispute(&who(ARBITRATOR), id, &release_action(), &mut t)
            .is_ok());
    }

    #[test]
    fn claimant_and_stranger_may_not_resolve() {
        let mut reg = registry();
        let mut t = target();
        let id = raise_with(&mut reg, &release_action());
        for caller in [CLAIMANT, STRANGER] {
            let err = reg
                .resolve_dispute(&who(caller), id, &release_action(), &mut t)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authorization);
        }
        assert!(!reg.dispute_is_closed(id).unwrap());
    }

    #[test]
    fn removed_arbitrator_loses_standing_on_open_disputes() {
        let mut reg = registry();
        let mut t = target();
        let id = raise_with(&mut reg, &release_action());
        reg.remove_arbitrators(&who(OWNER), &[addr(ARBITRATOR)])
            .unwrap();

        let err = reg.close_dispute(&who(ARBITRATOR), id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        let err = reg
            .suggest_dispute_resolution(&who(ARBITRATOR), id, reason())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        let err = reg
            .resolve_dispute(&who(ARBITRATOR), id, &release_action(), &mut t)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        assert!(!reg.dispute_is_closed(id).unwrap());
        assert_eq!(
            reg.dispute_resolution_hash(id).unwrap(),
            Some(release_action().commitment().unwrap())
        );
        assert!(t.applied.is_empty());
    }

    #[test]
    fn missing_commitment_is_distinct_from_no_action() {
        let mut reg = registry();
        let (id, _) = reg
            .raise_dispute(&who(CLAIMANT), None, addr(DEFENDANT), reason(), None)
            .unwrap();
        let err = reg
            .resolve_dispute(&who(DEFENDANT), id, &ResolutionAction::NoAction, &mut NoArbitrables)
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::NoResolutionCommitted(_)));
        assert_eq!(err.kind(), ErrorKind::Integrity);

        reg.suggest_dispute_resolution(
            &who(CLAIMANT),
            id,
            ResolutionAction::no_action_commitment().unwrap(),
        )
        .unwrap();
        let receipt = reg
            .resolve_dispute(&who(DEFENDANT), id, &ResolutionAction::NoAction, &mut NoArbitrables)
            .unwrap();
        assert_eq!(receipt.names(), vec!["DisputeResolved", "DisputeClosed"]);
    }

    #[test]
    fn no_action_never_touches_the_target() {
        let mut reg = registry();
        let mut t = target();
        let id = raise_with(&mut reg, &ResolutionAction::NoAction);
        let receipt = reg
            .resolve_dispute(&who(ARBITRATOR), id, &ResolutionAction::NoAction, &mut t)
            .unwrap();
        assert_eq!(receipt.names(), vec!["DisputeResolved", "DisputeClosed"]);
        assert!(t.applied.is_empty());
    }

    #[test]
    fn informational_dispute_resolves_without_target() {
        let mut reg = registry();
        let (id, _) = reg
            .raise_dispute(
                &who(CLAIMANT),
                None,
                addr(DEFENDANT),
                reason(),
                Some(release_action().commitment().unwrap()),
            )
            .unwrap();
        let receipt = reg
            .resolve_dispute(&who(DEFENDANT), id, &release_action(), &mut NoArbitrables)
            .unwrap();
        assert_eq!(receipt.names(), vec!["DisputeResolved", "DisputeClosed"]);
    }

    #[test]
    fn target_rejection_keeps_dispute_open() {
        let mut reg = registry();
        let mut t = target();
        t.accepts_from = addr(OWNER);
        let id = raise_with(&mut reg, &release_action());
        let err = reg
            .resolve_dispute(&who(DEFENDANT), id, &release_action(), &mut t)
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::DelegatedCallFailed { .. }));
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(!reg.dispute_is_closed(id).unwrap());
    }

    #[test]
    fn unreachable_target_keeps_dispute_open() {
        let mut reg = registry();
        let id = raise_with(&mut reg, &release_action());
        let err = reg
            .resolve_dispute(&who(DEFENDANT), id, &release_action(), &mut NoArbitrables)
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::DelegatedCallFailed { .. }));
        assert!(!reg.dispute_is_closed(id).unwrap());
    }

    #[test]
    fn registry_ownership_transfers() {
        let mut reg = registry();
        assert!(reg.transfer_ownership(&who(STRANGER), addr(3)).is_err());
        let receipt = reg.transfer_ownership(&who(OWNER), addr(3)).unwrap();
        assert_eq!(receipt.names(), vec!["OwnershipTransferred"]);
        assert_eq!(reg.owner(), addr(3));
        assert!(reg.add_arbitrators(&who(3), &[addr(0xB3)]).is_ok());
    }

    #[test]
    fn from_config_applies_self_dispute_flag() {
        let cfg = RegistryConfig {
            address: addr(REGISTRY),
            owner: addr(OWNER),
            arbitrators: vec![addr(ARBITRATOR)],
            allow_self_dispute: true,
        };
        let mut reg = DisputeRegistry::from_config(&cfg, SystemClock::new()).unwrap();
        assert_eq!(reg.address(), addr(REGISTRY));
        assert!(reg.is_arbitrator(addr(ARBITRATOR)));
        assert!(reg
            .raise_dispute(&who(CLAIMANT), None, addr(CLAIMANT), reason(), None)
            .is_ok());
    }
}
