//! Pipeline tracker: last-write-wins storage and forecast projection.

use chrono::{TimeZone, Utc};
use rm_copilot_core::{
    aggregator::PipelineForecast,
    client::{ClientRecord, ProductStatus, TransactionFrequency},
    config::Thresholds,
    pipeline::{PipelineStatus, PipelineTracker},
    portfolio::Portfolio,
};

fn portfolio() -> Portfolio {
    let records = vec![
        ClientRecord::new(
            "PT. Surya Gemilang",
            2500.0,
            TransactionFrequency::High,
            ProductStatus::None,
            ProductStatus::None,
            7,
            10,
            "",
        )
        .unwrap(),
        ClientRecord::new(
            "PT. Trijaya Abadi",
            1200.0,
            TransactionFrequency::Low,
            ProductStatus::Active,
            ProductStatus::None,
            2,
            45,
            "",
        )
        .unwrap(),
    ];
    Portfolio::ingest(records, &Thresholds::default()).unwrap()
}

#[test]
fn second_save_overwrites_first() {
    let mut tracker = PipelineTracker::new();
    let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 3, 8, 14, 30, 0).unwrap();

    let replaced = tracker.upsert(
        "PT. Surya Gemilang",
        PipelineStatus::Contacted,
        "intro call",
        "send deck",
        t1,
    );
    assert!(replaced.is_none());

    let replaced = tracker.upsert(
        "PT. Surya Gemilang",
        PipelineStatus::ProposalSent,
        "deck sent",
        "follow up Friday",
        t2,
    );
    assert_eq!(replaced.unwrap().status, PipelineStatus::Contacted);

    let update = tracker.get("PT. Surya Gemilang").unwrap();
    assert_eq!(update.status, PipelineStatus::ProposalSent);
    assert_eq!(update.notes, "deck sent");
    assert_eq!(update.next_action, "follow up Friday");
    assert_eq!(update.updated_at, t2);
    assert_eq!(tracker.len(), 1);
}

/// No transition discipline: a closed deal may be reopened.
#[test]
fn any_status_may_follow_any_status() {
    let mut tracker = PipelineTracker::new();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    tracker.upsert("PT. Trijaya Abadi", PipelineStatus::ClosedWon, "", "", now);
    tracker.upsert("PT. Trijaya Abadi", PipelineStatus::NotContacted, "", "", now);
    assert_eq!(tracker.get("PT. Trijaya Abadi").unwrap().status, PipelineStatus::NotContacted);
}

#[test]
fn unknown_client_is_absent() {
    assert!(PipelineTracker::new().get("PT. Nobody").is_none());
}

#[test]
fn status_counts_cover_every_stage_in_order() {
    let mut tracker = PipelineTracker::new();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    tracker.upsert("A", PipelineStatus::Interested, "", "", now);
    tracker.upsert("B", PipelineStatus::Interested, "", "", now);
    tracker.upsert("C", PipelineStatus::ClosedLost, "", "", now);

    let counts = tracker.status_counts();
    assert_eq!(counts.len(), 7);
    assert_eq!(counts[0], (PipelineStatus::NotContacted, 0));
    assert_eq!(counts[2], (PipelineStatus::Interested, 2));
    assert_eq!(counts[6], (PipelineStatus::ClosedLost, 1));
}

#[test]
fn forecast_projects_revenue_from_conversion() {
    let portfolio = portfolio();
    let mut tracker = PipelineTracker::new();
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
    tracker.upsert("PT. Surya Gemilang", PipelineStatus::ClosedWon, "", "", now);
    tracker.upsert("PT. Trijaya Abadi", PipelineStatus::Negotiation, "", "", now);
    // Not in the portfolio: counted as tracked, contributes no value.
    tracker.upsert("PT. Elsewhere", PipelineStatus::Contacted, "", "", now);

    let f = PipelineForecast::compute(&portfolio, &tracker);
    assert_eq!(f.tracked, 3);
    assert!((f.conversion_rate - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(f.pipeline_value, 1750.0 + 60.0);
    assert!((f.estimated_revenue - 1810.0 / 3.0).abs() < 1e-9);
}

#[test]
fn forecast_of_empty_tracker_is_zero() {
    let f = PipelineForecast::compute(&portfolio(), &PipelineTracker::new());
    assert_eq!(f.tracked, 0);
    assert_eq!(f.conversion_rate, 0.0);
    assert_eq!(f.pipeline_value, 0.0);
    assert_eq!(f.estimated_revenue, 0.0);
}

#[test]
fn statuses_serialise_snake_case() {
    assert_eq!(
        serde_json::to_string(&PipelineStatus::ProposalSent).unwrap(),
        "\"proposal_sent\""
    );
    assert_eq!(PipelineStatus::ClosedWon.to_string(), "Closed Won");
    assert!(PipelineStatus::ClosedLost.is_closed());
}
