//! Unit tests for screen routing and app state transitions.

use chrono::Utc;
use microreset::checkin::types::{AfternoonState, EventType, Trigger};
use microreset::navigation::{AppAction, AppState, Screen};
use microreset::recovery::duration::Intensity;
use microreset::recovery::protocol::RecoveryProtocol;
use uuid::Uuid;

#[test]
fn test_every_screen_round_trips_its_path() {
    for screen in Screen::all() {
        assert_eq!(Screen::from_path(screen.path()), Some(*screen));
    }
}

#[test]
fn test_paths_are_unique() {
    let paths: Vec<&str> = Screen::all().iter().map(|s| s.path()).collect();
    for (i, path) in paths.iter().enumerate() {
        assert!(!paths[i + 1..].contains(path), "duplicate path {}", path);
    }
}

#[test]
fn test_from_path_normalizes() {
    assert_eq!(Screen::from_path("/brief/"), Some(Screen::WeeklyBrief));
    assert_eq!(Screen::from_path(""), Some(Screen::Welcome));
    assert_eq!(Screen::from_path("/nowhere"), None);
}

#[test]
fn test_navigation_drives_nav_bar() {
    let state = AppState::default();
    assert_eq!(state.screen, Screen::Welcome);
    assert!(!state.nav_visible);

    let state = state.apply(AppAction::Navigate(Screen::Home));
    assert!(state.nav_visible);

    let state = state.apply(AppAction::Navigate(Screen::Checkin));
    assert!(!state.nav_visible);

    let state = state.apply(AppAction::SetNavVisible(true));
    assert!(state.nav_visible);
    assert_eq!(state.screen, Screen::Checkin);
}

#[test]
fn test_checkin_draft_flow() {
    let state = AppState::default().apply_all([
        AppAction::Navigate(Screen::Home),
        AppAction::BeginCheckin(Trigger::Midday),
        AppAction::SetAfternoonState(AfternoonState::BackTight),
        AppAction::SetBackPain(14),
    ]);

    assert_eq!(state.screen, Screen::Checkin);
    assert_eq!(state.draft.trigger, Some(Trigger::Midday));
    assert_eq!(state.draft.afternoon_state, Some(AfternoonState::BackTight));
    assert_eq!(state.draft.back_pain_score, Some(10));

    // A new check-in starts from a clean draft
    let state = state.apply(AppAction::BeginCheckin(Trigger::PostEvent));
    assert_eq!(state.draft.afternoon_state, None);

    let state = state.apply(AppAction::SetEvent(EventType::PoorSleep, Intensity::Light));
    assert_eq!(state.draft.event_type, Some(EventType::PoorSleep));

    let state = state.apply(AppAction::ClearDraft);
    assert!(!state.draft.is_submittable());
}

#[test]
fn test_protocol_lifecycle_in_state() {
    let now = Utc::now();
    let protocol =
        RecoveryProtocol::start(Uuid::new_v4(), EventType::LongDesk, Intensity::Moderate, now);

    let state = AppState::default().apply(AppAction::StartProtocol(protocol));
    assert!(state.has_active_protocol());

    let state = state.apply(AppAction::AdvanceProtocol(now));
    assert!(!state.has_active_protocol());
    assert!(state.active_protocol.is_some());

    let state = state.apply(AppAction::ClearProtocol);
    assert!(state.active_protocol.is_none());
}

#[test]
fn test_advancing_without_protocol_is_noop() {
    let state = AppState::default();
    let next = state.clone().apply(AppAction::AdvanceProtocol(Utc::now()));
    assert_eq!(next, state);
}
