//! Check-in context types and records.
//!
//! A check-in is the user telling the app how they are doing at a given
//! moment. The trigger and the optional context fields drive category
//! selection and, after a logged event, the recovery protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::categories::{Category, CategoryInput, ConditionTag};
use crate::recovery::duration::Intensity;

/// What initiated a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// First check-in of the day
    Morning,
    /// Afternoon slump check-in
    Midday,
    /// After a logged event (heavy night, long desk day, ...)
    PostEvent,
    /// Wind-down before bed
    PreSleep,
    /// Any trigger value not known to this build
    #[serde(other)]
    Other,
}

impl Trigger {
    /// All known triggers, in the order they occur during a day.
    pub fn all() -> &'static [Trigger] {
        &[
            Trigger::Morning,
            Trigger::Midday,
            Trigger::PostEvent,
            Trigger::PreSleep,
        ]
    }

    /// Stable snake_case name used in storage and context tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Morning => "morning",
            Trigger::Midday => "midday",
            Trigger::PostEvent => "post_event",
            Trigger::PreSleep => "pre_sleep",
            Trigger::Other => "other",
        }
    }

    /// Parse a stored name. Unknown names map to `Trigger::Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "morning" => Trigger::Morning,
            "midday" => Trigger::Midday,
            "post_event" => Trigger::PostEvent,
            "pre_sleep" => Trigger::PreSleep,
            _ => Trigger::Other,
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the user feels at the midday check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfternoonState {
    /// Stiff lower back from sitting
    BackTight,
    /// Low energy
    Sluggish,
    /// Tense or anxious
    Stressed,
    /// Anything else; takes the default midday branch
    #[serde(other)]
    Other,
}

impl AfternoonState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AfternoonState::BackTight => "back_tight",
            AfternoonState::Sluggish => "sluggish",
            AfternoonState::Stressed => "stressed",
            AfternoonState::Other => "other",
        }
    }

    /// Parse a stored name. Unknown names map to `AfternoonState::Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "back_tight" => AfternoonState::BackTight,
            "sluggish" => AfternoonState::Sluggish,
            "stressed" => AfternoonState::Stressed,
            _ => AfternoonState::Other,
        }
    }
}

/// Kind of event logged before a post-event check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Late night out, alcohol, rich food
    HeavyNight,
    /// Long day seated at a desk
    LongDesk,
    /// Short or broken sleep
    PoorSleep,
    /// Flight or long drive
    Travel,
    /// Any event value not known to this build
    #[serde(other)]
    Other,
}

impl EventType {
    /// All known event types.
    pub fn all() -> &'static [EventType] {
        &[
            EventType::HeavyNight,
            EventType::LongDesk,
            EventType::PoorSleep,
            EventType::Travel,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::HeavyNight => "heavy_night",
            EventType::LongDesk => "long_desk",
            EventType::PoorSleep => "poor_sleep",
            EventType::Travel => "travel",
            EventType::Other => "other",
        }
    }

    /// Parse a stored name. Unknown names map to `EventType::Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "heavy_night" => EventType::HeavyNight,
            "long_desk" => EventType::LongDesk,
            "poor_sleep" => EventType::PoorSleep,
            "travel" => EventType::Travel,
            _ => EventType::Other,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Answers collected while the user walks through the check-in screens.
///
/// Every field stays optional until submission; `CheckinService::submit`
/// decides which ones are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinDraft {
    /// What started the check-in
    pub trigger: Option<Trigger>,
    /// Midday answer
    pub afternoon_state: Option<AfternoonState>,
    /// Logged event for post-event check-ins
    pub event_type: Option<EventType>,
    /// How heavy the logged event was
    pub intensity: Option<Intensity>,
    /// Self-reported back pain, 0-10
    pub back_pain_score: Option<u8>,
}

impl CheckinDraft {
    /// Start a draft for the given trigger.
    pub fn for_trigger(trigger: Trigger) -> Self {
        Self {
            trigger: Some(trigger),
            ..Default::default()
        }
    }

    /// Whether the draft has enough answers to submit.
    pub fn is_submittable(&self) -> bool {
        self.trigger.is_some()
    }

    /// Build the category-selection input for this draft.
    ///
    /// Returns `None` while no trigger has been chosen.
    pub fn to_category_input(&self, conditions: &[ConditionTag]) -> Option<CategoryInput> {
        let trigger = self.trigger?;
        Some(CategoryInput {
            trigger,
            conditions: conditions.to_vec(),
            afternoon_state: self.afternoon_state,
            event_type: self.event_type,
            back_pain_score: self.back_pain_score,
        })
    }
}

/// A submitted check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// What started the check-in
    pub trigger: Trigger,
    /// Midday answer, if asked
    pub afternoon_state: Option<AfternoonState>,
    /// Logged event, if any
    pub event_type: Option<EventType>,
    /// Event intensity, if any
    pub intensity: Option<Intensity>,
    /// Self-reported back pain, 0-10
    pub back_pain_score: Option<u8>,
    /// Categories selected for this check-in
    pub categories: Vec<Category>,
    /// Micro-actions suggested to the user
    pub suggested_action_ids: Vec<Uuid>,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl CheckIn {
    /// Create a check-in record from a submitted draft.
    pub fn from_draft(
        user_id: Uuid,
        trigger: Trigger,
        draft: &CheckinDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            trigger,
            afternoon_state: draft.afternoon_state,
            event_type: draft.event_type,
            intensity: draft.intensity,
            back_pain_score: draft.back_pain_score,
            categories: Vec::new(),
            suggested_action_ids: Vec::new(),
            created_at,
        }
    }
}
