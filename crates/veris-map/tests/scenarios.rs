//! End-to-end scenarios over a seeded in-memory SQLite store.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use serde_json::json;

use veris_map::{MapError, MapSession};
use veris_models::config::MapConfig;
use veris_models::profile::{RiskProfile, RiskTier};
use veris_models::property::{Property, PropertyType, ReraStatus};
use veris_store::{PropertyReader, SqliteProperties};

fn seed() -> Vec<Property> {
    let base = |id: &str, title: &str, locality: &str| Property {
        id: id.to_string(),
        title: title.to_string(),
        locality: locality.to_string(),
        property_type: PropertyType::Apartment,
        price: 9_000_000,
        bedrooms: 2,
        carpet_area: 950,
        rental_yield: dec!(4.0),
        appreciation: dec!(50),
        litigation: 0,
        rera_status: ReraStatus::Approved,
        maintenance: dec!(3200),
        lat: Some(18.5590),
        lng: Some(73.7868),
        developer: None,
        possession_date: None,
        listed_at: None,
    };

    let mut strong_baner = base("PROP_0001", "2BHK Apartment in Baner", "Baner");
    strong_baner.lat = Some(18.5590);

    let mut litigated_baner = base("PROP_0002", "3BHK Apartment in Baner", "Baner");
    litigated_baner.bedrooms = 3;
    litigated_baner.price = 14_000_000;
    litigated_baner.litigation = 2;
    litigated_baner.rera_status = ReraStatus::Pending;
    litigated_baner.rental_yield = dec!(2.0);
    litigated_baner.appreciation = dec!(20);

    let mut kothrud = base("PROP_0003", "2BHK Apartment in Kothrud", "Kothrud");
    kothrud.lat = Some(18.5074);
    kothrud.lng = Some(73.8077);

    let mut unmapped = base("PROP_0004", "Plot in Wagholi", "Wagholi");
    unmapped.property_type = PropertyType::Plot;
    unmapped.lat = None;
    unmapped.lng = None;

    vec![strong_baner, litigated_baner, kothrud, unmapped]
}

fn build_session(profile: RiskProfile) -> MapSession {
    let mut sqlite = SqliteProperties::open_in_memory().unwrap();
    sqlite.upsert_batch(&seed()).unwrap();
    let reader = PropertyReader::new(sqlite, 100, Duration::from_secs(60));
    MapSession::new(Arc::new(reader), profile, MapConfig::default())
}

#[tokio::test]
async fn conversation_narrows_then_resets() {
    let mut session = build_session(RiskProfile::default());

    // Opening view: everything with a location shows up.
    let projection = session.refresh().await.unwrap();
    assert_eq!(projection.markers.len(), 3);

    // "Show me Baner" -> assistant emits a FILTER command.
    let outcome = session
        .apply_reply(
            r#"{"reply": "Here are the Baner listings.", "map_command": {"type": "FILTER", "payload": {"locality": "Baner"}}}"#,
        )
        .unwrap();
    assert!(outcome.state.is_some());

    let projection = session.refresh().await.unwrap();
    assert_eq!(projection.markers.len(), 2);
    assert!(projection.markers.iter().all(|m| m.id.starts_with("PROP_000")));

    // Narrow to strong buys only.
    session
        .apply_command_value(&json!({"type": "FILTER", "payload": {"min_score": 7.0}}))
        .unwrap();
    let projection = session.refresh().await.unwrap();
    assert_eq!(projection.markers.len(), 1);
    assert_eq!(projection.markers[0].id, "PROP_0001");
    assert_eq!(projection.markers[0].score, dec!(10.0));

    // Reset brings everything back.
    session
        .apply_command_value(&json!({"type": "RESET"}))
        .unwrap();
    let projection = session.refresh().await.unwrap();
    assert_eq!(projection.markers.len(), 3);
}

#[tokio::test]
async fn filter_and_fly_pins_the_viewport() {
    let mut session = build_session(RiskProfile::default());

    let state = session
        .apply_command_value(&json!({"type": "FILTER_AND_FLY", "payload": {
            "locality": "Kothrud",
            "center_lat": 18.5074, "center_lng": 73.8077, "zoom": 13.0
        }}))
        .unwrap();
    assert!(state.viewport.is_some());

    let projection = session.refresh().await.unwrap();
    assert_eq!(projection.markers.len(), 1);
    let viewport = projection.viewport.unwrap();
    assert_eq!(viewport.zoom, 13.0);
    assert!((viewport.center_lat - 18.5074).abs() < 1e-9);
}

#[tokio::test]
async fn stale_fetch_loses_to_newer_filter() {
    let mut session = build_session(RiskProfile::default());

    // Fetch launched for the unfiltered state...
    let stale = session.begin_refresh();

    // ...but the user narrows to Kothrud before it lands.
    session
        .apply_command_value(&json!({"type": "FILTER", "payload": {"locality": "Kothrud"}}))
        .unwrap();
    assert!(stale.token().is_cancelled());

    let err = session.complete(stale, seed()).unwrap_err();
    assert!(matches!(err, MapError::Stale { .. }));

    let projection = session.refresh().await.unwrap();
    assert_eq!(projection.markers.len(), 1);
    assert_eq!(projection.markers[0].id, "PROP_0003");
}

#[tokio::test]
async fn conservative_profile_changes_nothing_but_warnings() {
    let conservative = RiskProfile {
        tier: RiskTier::Conservative,
        risk_score: Some(2),
    };
    let mut session = build_session(conservative);

    // Marker scores are profile-independent; the tier only affects the
    // warnings surfaced in the detail view.
    let projection = session.refresh().await.unwrap();
    let strong = projection
        .markers
        .iter()
        .find(|m| m.id == "PROP_0001")
        .unwrap();
    assert_eq!(strong.score, dec!(10.0));
    let weak = projection
        .markers
        .iter()
        .find(|m| m.id == "PROP_0002")
        .unwrap();
    assert_eq!(weak.score, dec!(4.2));
}

#[tokio::test]
async fn malformed_commands_never_break_the_session() {
    let mut session = build_session(RiskProfile::default());
    session.refresh().await.unwrap();
    let before = session.filter_state().clone();

    for raw in [
        r#"{"reply": "hm", "map_command": {"type": "ZOOM_OUT"}}"#,
        r#"{"reply": "hm", "map_command": {"type": "FILTER"}}"#,
        r#"{"reply": "hm", "map_command": {"type": "FILTER", "payload": {"min_price": "lots"}}}"#,
        r#"{"reply": "hm", "map_command": {"type": "FILTER_AND_FLY", "payload": {"locality": "Baner", "zoom": 12.0}}}"#,
    ] {
        let outcome = session.apply_reply(raw).unwrap();
        assert_eq!(outcome.reply, "hm");
        assert_eq!(outcome.state, None);
    }

    assert_eq!(session.filter_state(), &before);
    assert_eq!(session.projection().markers.len(), 3);
}
