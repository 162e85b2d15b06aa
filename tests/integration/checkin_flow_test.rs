//! Integration tests for the check-in flow.
//!
//! Drives the app state through a check-in, submits the draft and checks
//! what ends up stored.

use chrono::{Duration, Utc};
use microreset::actions::categories::{Category, ConditionTag};
use microreset::checkin::service::{CheckinError, CheckinService};
use microreset::checkin::types::{EventType, Trigger};
use microreset::navigation::{AppAction, AppState, Screen};
use microreset::recovery::duration::Intensity;
use microreset::storage::config::{AppConfig, UserProfile};
use microreset::storage::database::Database;
use microreset::storage::recovery_store::RecoveryStore;
use microreset::storage::subscription_store::SubscriptionStore;
use microreset::subscription::gating::GateReason;
use microreset::subscription::types::{Plan, Subscription, SubscriptionStatus};

fn create_user(db: &Database, conditions: &[ConditionTag]) -> UserProfile {
    let mut user = UserProfile::new("Jordan".to_string());
    user.set_conditions(conditions);
    user.onboarding_complete = true;
    db.insert_user(&user).unwrap();
    user
}

#[test]
fn test_morning_checkin_from_app_state() {
    let db = Database::open_in_memory().unwrap();
    let user = create_user(&db, &[ConditionTag::BackPain]);
    let config = AppConfig::default();

    let state = AppState::default().apply_all([
        AppAction::Navigate(Screen::Home),
        AppAction::BeginCheckin(Trigger::Morning),
        AppAction::SetBackPain(6),
    ]);

    let outcome = CheckinService::from_config(&db, &config)
        .submit(&user.id, &state.draft, Utc::now())
        .unwrap();

    assert_eq!(
        outcome.selection.categories,
        vec![Category::SpinalMobility, Category::GentleStretch]
    );
    assert!(outcome
        .actions
        .iter()
        .all(|a| outcome.selection.contains(a.category)));

    let state = state.apply_all([
        AppAction::ClearDraft,
        AppAction::Navigate(Screen::CheckinResult),
    ]);
    assert!(!state.nav_visible);

    let stored = db.get_checkin(&outcome.checkin.id).unwrap().unwrap();
    assert_eq!(stored.back_pain_score, Some(6));
    assert_eq!(stored.categories, outcome.selection.categories);
    assert_eq!(
        stored.suggested_action_ids,
        outcome.actions.iter().map(|a| a.id).collect::<Vec<_>>()
    );
}

#[test]
fn test_post_event_flow_with_protocol() {
    let db = Database::open_in_memory().unwrap();
    let user = create_user(&db, &[ConditionTag::Gout]);
    let service = CheckinService::from_config(&db, &AppConfig::default());
    let start = Utc::now();

    let state = AppState::default().apply_all([
        AppAction::BeginCheckin(Trigger::PostEvent),
        AppAction::SetEvent(EventType::HeavyNight, Intensity::Moderate),
    ]);
    let outcome = service.submit(&user.id, &state.draft, start).unwrap();
    let protocol = outcome.protocol.clone().unwrap();
    assert_eq!(protocol.total_days, 2);

    let state = state.apply(AppAction::StartProtocol(protocol.clone()));
    assert!(state.has_active_protocol());

    // The stored protocol advances alongside the in-memory one
    let recovery = RecoveryStore::new(db.connection());
    recovery
        .advance_active(&user.id, start + Duration::days(1))
        .unwrap();
    let finished = recovery
        .advance_active(&user.id, start + Duration::days(2))
        .unwrap()
        .unwrap();
    assert!(finished.is_completed());
    assert!(recovery.active_for_user(&user.id).unwrap().is_none());

    let state = state.apply_all([
        AppAction::AdvanceProtocol(start + Duration::days(1)),
        AppAction::AdvanceProtocol(start + Duration::days(2)),
    ]);
    assert!(!state.has_active_protocol());
}

#[test]
fn test_free_user_hits_post_event_limit_then_upgrades() {
    let db = Database::open_in_memory().unwrap();
    let user = create_user(&db, &[]);
    let service = CheckinService::from_config(&db, &AppConfig::default());

    let draft = AppState::default()
        .apply_all([
            AppAction::BeginCheckin(Trigger::PostEvent),
            AppAction::SetEvent(EventType::PoorSleep, Intensity::Heavy),
        ])
        .draft;

    for _ in 0..2 {
        service.submit(&user.id, &draft, Utc::now()).unwrap();
    }
    let err = service.submit(&user.id, &draft, Utc::now()).unwrap_err();
    assert!(matches!(err, CheckinError::Gated(GateReason::FreeLimit)));

    SubscriptionStore::new(db.connection())
        .upsert(&Subscription::new(
            user.id,
            SubscriptionStatus::Trialing,
            Plan::Household,
        ))
        .unwrap();
    service.submit(&user.id, &draft, Utc::now()).unwrap();

    // Paid check-ins do not touch the counter
    let usage = db.get_user(&user.id).unwrap().unwrap().usage;
    assert_eq!(usage.free_post_event_uses, 2);
    assert_eq!(db.count_checkins(&user.id).unwrap(), 3);
}

#[test]
fn test_non_post_event_checkins_are_never_gated() {
    let db = Database::open_in_memory().unwrap();
    let user = create_user(&db, &[]);
    let service = CheckinService::from_config(&db, &AppConfig::default());

    for trigger in [Trigger::Morning, Trigger::Midday, Trigger::PreSleep] {
        for _ in 0..3 {
            let draft = AppState::default()
                .apply(AppAction::BeginCheckin(trigger))
                .draft;
            assert!(service.submit(&user.id, &draft, Utc::now()).is_ok());
        }
    }
    assert_eq!(db.get_user(&user.id).unwrap().unwrap().usage.free_post_event_uses, 0);
}
