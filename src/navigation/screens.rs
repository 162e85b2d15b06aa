//! App screens and their routes.

use serde::{Deserialize, Serialize};

/// Every screen the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Landing screen for signed-out users
    #[default]
    Welcome,
    /// Email/password sign-in
    SignIn,
    /// Condition and schedule setup
    Onboarding,
    /// Daily overview
    Home,
    /// Check-in questions
    Checkin,
    /// Suggested actions after a check-in
    CheckinResult,
    /// Full action library
    Actions,
    /// Active recovery protocol
    Recovery,
    /// Weekly brief
    WeeklyBrief,
    /// Plans
    Pricing,
    /// Profile and preferences
    Settings,
}

impl Screen {
    /// Get all screens.
    pub fn all() -> &'static [Screen] {
        &[
            Screen::Welcome,
            Screen::SignIn,
            Screen::Onboarding,
            Screen::Home,
            Screen::Checkin,
            Screen::CheckinResult,
            Screen::Actions,
            Screen::Recovery,
            Screen::WeeklyBrief,
            Screen::Pricing,
            Screen::Settings,
        ]
    }

    /// Route path for this screen.
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Welcome => "/",
            Screen::SignIn => "/sign-in",
            Screen::Onboarding => "/onboarding",
            Screen::Home => "/home",
            Screen::Checkin => "/checkin",
            Screen::CheckinResult => "/checkin/result",
            Screen::Actions => "/actions",
            Screen::Recovery => "/recovery",
            Screen::WeeklyBrief => "/brief",
            Screen::Pricing => "/pricing",
            Screen::Settings => "/settings",
        }
    }

    /// Resolve a route path. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Screen> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::all().iter().copied().find(|s| s.path() == normalized)
    }

    /// Whether the bottom navigation bar is visible on this screen.
    pub fn shows_nav_bar(&self) -> bool {
        matches!(
            self,
            Screen::Home | Screen::Actions | Screen::Recovery | Screen::WeeklyBrief | Screen::Settings
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Welcome => "Welcome",
            Screen::SignIn => "Sign In",
            Screen::Onboarding => "Get Started",
            Screen::Home => "Today",
            Screen::Checkin => "Check In",
            Screen::CheckinResult => "Your Reset",
            Screen::Actions => "Actions",
            Screen::Recovery => "Recovery",
            Screen::WeeklyBrief => "Weekly Brief",
            Screen::Pricing => "Plans",
            Screen::Settings => "Settings",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
