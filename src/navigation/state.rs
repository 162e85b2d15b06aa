//! Explicit application state.
//!
//! All UI state lives in one `AppState` value that callers own and pass
//! around. `AppState::apply` consumes the state and an `AppAction` and
//! returns the next state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::screens::Screen;
use crate::checkin::types::{AfternoonState, CheckinDraft, EventType, Trigger};
use crate::recovery::duration::Intensity;
use crate::recovery::protocol::RecoveryProtocol;

/// Application UI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Screen currently shown
    pub screen: Screen,
    /// Whether the bottom navigation bar is shown
    pub nav_visible: bool,
    /// Recovery protocol in progress, if any
    pub active_protocol: Option<RecoveryProtocol>,
    /// Answers of the check-in being filled in
    pub draft: CheckinDraft,
}

impl Default for AppState {
    fn default() -> Self {
        let screen = Screen::default();
        Self {
            screen,
            nav_visible: screen.shows_nav_bar(),
            active_protocol: None,
            draft: CheckinDraft::default(),
        }
    }
}

/// A state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppAction {
    /// Show a screen; nav visibility follows the screen
    Navigate(Screen),
    /// Override nav visibility (e.g. while a keyboard is open)
    SetNavVisible(bool),
    /// Start a fresh check-in draft and open the check-in screen
    BeginCheckin(Trigger),
    SetAfternoonState(AfternoonState),
    SetEvent(EventType, Intensity),
    SetBackPain(u8),
    ClearDraft,
    /// Make a protocol the active one
    StartProtocol(RecoveryProtocol),
    /// Complete one day of the active protocol
    AdvanceProtocol(DateTime<Utc>),
    ClearProtocol,
}

impl AppState {
    /// Apply an action, returning the next state.
    pub fn apply(self, action: AppAction) -> AppState {
        match action {
            AppAction::Navigate(screen) => AppState {
                screen,
                nav_visible: screen.shows_nav_bar(),
                ..self
            },
            AppAction::SetNavVisible(nav_visible) => AppState {
                nav_visible,
                ..self
            },
            AppAction::BeginCheckin(trigger) => AppState {
                screen: Screen::Checkin,
                nav_visible: Screen::Checkin.shows_nav_bar(),
                draft: CheckinDraft::for_trigger(trigger),
                ..self
            },
            AppAction::SetAfternoonState(state) => self.with_draft(|d| CheckinDraft {
                afternoon_state: Some(state),
                ..d
            }),
            AppAction::SetEvent(event, intensity) => self.with_draft(|d| CheckinDraft {
                event_type: Some(event),
                intensity: Some(intensity),
                ..d
            }),
            AppAction::SetBackPain(score) => self.with_draft(|d| CheckinDraft {
                back_pain_score: Some(score.min(10)),
                ..d
            }),
            AppAction::ClearDraft => AppState {
                draft: CheckinDraft::default(),
                ..self
            },
            AppAction::StartProtocol(protocol) => AppState {
                active_protocol: Some(protocol),
                ..self
            },
            AppAction::AdvanceProtocol(now) => {
                let active_protocol = self.active_protocol.map(|mut p| {
                    p.advance(now);
                    p
                });
                AppState {
                    active_protocol,
                    ..self
                }
            }
            AppAction::ClearProtocol => AppState {
                active_protocol: None,
                ..self
            },
        }
    }

    /// Apply several actions in order.
    pub fn apply_all(self, actions: impl IntoIterator<Item = AppAction>) -> AppState {
        actions.into_iter().fold(self, AppState::apply)
    }

    fn with_draft(self, update: impl FnOnce(CheckinDraft) -> CheckinDraft) -> AppState {
        let draft = update(self.draft);
        AppState { draft, ..self }
    }

    /// Whether a protocol is active and not yet completed.
    pub fn has_active_protocol(&self) -> bool {
        self.active_protocol
            .as_ref()
            .map(|p| !p.is_completed())
            .unwrap_or(false)
    }
}
