//! Ingestion policy: validation, duplicate rejection, order preservation.

use rm_copilot_core::{
    classifier::OpportunityTag,
    client::{ClientRecord, ProductStatus, TransactionFrequency},
    config::Thresholds,
    error::CopilotError,
    portfolio::Portfolio,
};

fn record(name: &str, balance: f64) -> ClientRecord {
    ClientRecord::new(
        name,
        balance,
        TransactionFrequency::High,
        ProductStatus::None,
        ProductStatus::None,
        12,
        30,
        "",
    )
    .unwrap()
}

#[test]
fn ingest_classifies_in_input_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let portfolio = Portfolio::ingest(
        vec![record("PT. Jaya Raya", 500.0), record("PT. Mega Indah", 2500.0)],
        &Thresholds::default(),
    )
    .unwrap();

    let names: Vec<_> = portfolio.clients().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["PT. Jaya Raya", "PT. Mega Indah"]);
    assert_eq!(portfolio.get("PT. Mega Indah").unwrap().tag(), OpportunityTag::TargetSmeLoan);
}

#[test]
fn duplicate_names_reject_the_batch() {
    let err = Portfolio::ingest(
        vec![record("PT. Jaya Raya", 500.0), record("PT. Jaya Raya", 900.0)],
        &Thresholds::default(),
    )
    .unwrap_err();
    match err {
        CopilotError::DuplicateClient { name } => assert_eq!(name, "PT. Jaya Raya"),
        other => panic!("expected DuplicateClient, got {other:?}"),
    }
}

#[test]
fn negative_balance_in_json_rejected_at_ingestion() {
    let json = r#"[{
        "name": "PT. Citra Abadi",
        "giro_balance": -10,
        "txn_frequency": "Low",
        "sme_loan": "None",
        "payroll": "None",
        "tenure_years": 3,
        "days_since_contact": 5
    }]"#;
    let err = Portfolio::from_json(json, &Thresholds::default()).unwrap_err();
    assert!(matches!(err, CopilotError::NegativeAmount { .. }));
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = Portfolio::from_json("[{", &Thresholds::default()).unwrap_err();
    assert!(matches!(err, CopilotError::Serialization(_)));
}

#[test]
fn empty_portfolio_is_valid() {
    let portfolio = Portfolio::ingest(Vec::new(), &Thresholds::default()).unwrap();
    assert!(portfolio.is_empty());
    assert_eq!(portfolio.len(), 0);
}

#[test]
fn reclassify_is_idempotent_and_follows_thresholds() {
    let t = Thresholds::default();
    let mut portfolio = Portfolio::ingest(
        vec![record("PT. Graha Prima", 2500.0), record("PT. Harapan Kita", 1200.0)],
        &t,
    )
    .unwrap();
    let before = portfolio.clients().to_vec();

    portfolio.reclassify(&t);
    assert_eq!(portfolio.clients(), before.as_slice());

    let raised = Thresholds { high_value_giro: 3000.0, ..t };
    portfolio.reclassify(&raised);
    assert_eq!(portfolio.get("PT. Graha Prima").unwrap().tag(), OpportunityTag::TargetPayroll);
}

#[test]
fn classified_client_serialises_flat() {
    let records = vec![record("PT. Duta Mandiri", 2500.0)];
    let portfolio = Portfolio::ingest(records, &Thresholds::default()).unwrap();
    let value = serde_json::to_value(&portfolio.clients()[0]).unwrap();
    assert_eq!(value["name"], "PT. Duta Mandiri");
    assert_eq!(value["tag"], "TARGET_SME_LOAN");
    assert_eq!(value["potential_value"], 1750.0);
    assert_eq!(value["loyalty"], "Gold");
}
