//! Integration tests for scenario previews against the free tier.

use microreset::checkin::types::EventType;
use microreset::recovery::duration::Intensity;
use microreset::scenario::{ScenarioError, ScenarioService};
use microreset::storage::config::{AppConfig, UserProfile};
use microreset::storage::database::Database;
use microreset::subscription::gating::{gate_report, GateReason};

#[test]
fn test_second_free_view_is_gated() {
    let db = Database::open_in_memory().unwrap();
    let user = UserProfile::new("Traveller".to_string());
    db.insert_user(&user).unwrap();

    let config = AppConfig::default();
    let service = ScenarioService::new(&db, config.free_tier);

    let preview = service
        .view(&user.id, EventType::Travel, Intensity::Heavy)
        .unwrap();
    assert!(preview.recovery_days >= 1);

    let err = service
        .view(&user.id, EventType::HeavyNight, Intensity::Light)
        .unwrap_err();
    assert!(matches!(err, ScenarioError::Gated(GateReason::FreeLimit)));

    let usage = db.get_user(&user.id).unwrap().unwrap().usage;
    assert_eq!(usage.free_scenario_uses, 1);
    assert!(!gate_report(None, &usage, &config.free_tier).scenario.allowed);
}
