//! Bootstrapping a custody ledger and a dispute registry from YAML, then
//! running the full escrow flow from deposit to payee withdrawal.

use arbiter_core::{
    digest_of, Address, Amount, Caller, ErrorKind, ManualClock, ResolutionAction, Timestamp,
};
use arbiter_custody::{AssetCustody, CustodyConfig};
use arbiter_disputes::{DisputeRegistry, RegistryConfig};

const CUSTODY_YAML: &str = r#"
address: "0x00000000000000000000000000000000000000c1"
owner: "0x00000000000000000000000000000000000000a1"
"#;

const REGISTRY_YAML: &str = r#"
address: "0x00000000000000000000000000000000000000d1"
owner: "0x00000000000000000000000000000000000000a1"
arbitrators:
  - "0x00000000000000000000000000000000000000b1"
  - "0x00000000000000000000000000000000000000b2"
"#;

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn escrow_flow_from_configuration() {
    init_tracing();

    let operator = addr("0x00000000000000000000000000000000000000a1");
    let arbitrator = addr("0x00000000000000000000000000000000000000b2");
    let payer = addr("0x0000000000000000000000000000000000000001");
    let payee = addr("0x0000000000000000000000000000000000000003");

    let custody_cfg = CustodyConfig::from_yaml_str(CUSTODY_YAML).unwrap();
    let registry_cfg = RegistryConfig::from_yaml_str(REGISTRY_YAML).unwrap();

    let mut custody = AssetCustody::from_config(&custody_cfg).unwrap();
    let mut registry = DisputeRegistry::from_config(
        &registry_cfg,
        ManualClock::starting_at(Timestamp::parse("2026-01-15T12:00:00Z").unwrap()),
    )
    .unwrap();
    assert!(registry.is_arbitrator(arbitrator));

    custody
        .treasury_mut()
        .fund(payer, Amount::new(5_000))
        .unwrap();
    custody
        .add_deposit(&Caller::authenticated(payer), payee, Amount::new(3_000))
        .unwrap();
    custody
        .release_deposit(&Caller::authenticated(payer), payee, Amount::new(1_000))
        .unwrap();
    custody
        .transfer_ownership(&Caller::authenticated(operator), registry.address())
        .unwrap();

    let settlement = ResolutionAction::ForceReleaseDeposit {
        payee,
        payer,
        amount: Amount::new(2_000),
    };
    let (id, _) = registry
        .raise_dispute(
            &Caller::authenticated(payee),
            Some(custody.address()),
            payer,
            digest_of(&"remaining balance withheld").unwrap(),
            Some(settlement.commitment().unwrap()),
        )
        .unwrap();
    assert_eq!(
        registry.dispute_raised_at(id).unwrap().to_iso8601(),
        "2026-01-15T12:00:00Z"
    );

    registry
        .resolve_dispute(
            &Caller::authenticated(arbitrator),
            id,
            &settlement,
            &mut custody,
        )
        .unwrap();
    custody
        .withdraw_deposit(&Caller::authenticated(payee), payee)
        .unwrap();

    assert_eq!(custody.treasury().balance_of(payee), Amount::new(3_000));
    assert_eq!(custody.treasury().balance_of(payer), Amount::new(2_000));
    assert_eq!(custody.total_held(), Amount::ZERO);
    assert!(custody.is_conserved());
}

#[test]
fn invalid_configurations_are_validation_errors() {
    let null_owner = r#"
address: "0x00000000000000000000000000000000000000c1"
owner: "0x0000000000000000000000000000000000000000"
"#;
    let err = CustodyConfig::from_yaml_str(null_owner).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let bad_arbitrator = r#"
address: "0x00000000000000000000000000000000000000d1"
owner: "0x00000000000000000000000000000000000000a1"
arbitrators: ["0xnot-an-address"]
"#;
    let err = RegistryConfig::from_yaml_str(bad_arbitrator).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
