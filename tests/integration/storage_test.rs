//! Integration tests for on-disk storage and configuration.

use chrono::Utc;
use microreset::actions::catalog::builtin_actions;
use microreset::actions::categories::ConditionTag;
use microreset::checkin::types::{CheckIn, CheckinDraft, Trigger};
use microreset::storage::action_store::ActionStore;
use microreset::storage::config::{load_config_from, save_config_to, AppConfig, UserProfile};
use microreset::storage::database::Database;
use microreset::storage::recovery_store::RecoveryStore;
use microreset::subscription::types::MeteredFeature;
use tempfile::TempDir;

#[test]
fn test_database_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("microreset.db");

    let user_id = {
        let db = Database::open(&path).unwrap();
        let mut user = UserProfile::new("Persisted".to_string());
        user.set_conditions(&[ConditionTag::Cholesterol]);
        db.insert_user(&user).unwrap();
        db.increment_usage(&user.id, MeteredFeature::ScenarioView)
            .unwrap();
        ActionStore::new(db.connection()).seed_builtin().unwrap();
        user.id
    };

    let db = Database::open(&path).unwrap();
    let user = db.get_user(&user_id).unwrap().unwrap();
    assert_eq!(user.name, "Persisted");
    assert_eq!(user.conditions, vec![ConditionTag::Cholesterol]);
    assert_eq!(user.usage.free_scenario_uses, 1);
    assert_eq!(
        ActionStore::new(db.connection()).count().unwrap(),
        builtin_actions().len()
    );
}

#[test]
fn test_deleting_user_cascades() {
    let db = Database::open_in_memory().unwrap();
    let user = UserProfile::new("Leaving".to_string());
    db.insert_user(&user).unwrap();

    let checkin = CheckIn::from_draft(
        user.id,
        Trigger::Morning,
        &CheckinDraft::for_trigger(Trigger::Morning),
        Utc::now(),
    );
    db.insert_checkin(&checkin).unwrap();

    db.delete_user(&user.id).unwrap();
    assert_eq!(db.count_checkins(&user.id).unwrap(), 0);
    assert!(RecoveryStore::new(db.connection())
        .list_for_user(&user.id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_config_round_trip_and_partial_files() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    // Missing file gives defaults rooted next to it
    let config = load_config_from(&path).unwrap();
    assert_eq!(config.database_path(), temp_dir.path().join("microreset.db"));

    let mut config = AppConfig::default();
    config.checkin.recent_action_window_hours = 6;
    config.free_tier.brief_reads = 4;
    save_config_to(&config, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.checkin.recent_action_window_hours, 6);
    assert_eq!(loaded.free_tier.brief_reads, 4);
    assert_eq!(loaded.free_tier.post_event_checkins, 2);

    std::fs::write(&path, "[free_tier]\nscenario_views = 5\n").unwrap();
    let partial = load_config_from(&path).unwrap();
    assert_eq!(partial.free_tier.scenario_views, 5);
    assert_eq!(partial.free_tier.brief_reads, 1);
    assert_eq!(partial.logging.filter, "info");
}

#[test]
fn test_invalid_config_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[checkin]\nrecent_action_window_hours = \"soon\"\n").unwrap();
    assert!(load_config_from(&path).is_err());
}
