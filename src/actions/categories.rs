//! Condition-weighted category selection.
//!
//! Maps a check-in context to at most two micro-action categories:
//! 1. A base pair from the trigger table (morning and midday branch further).
//! 2. Bonus categories for each known health condition, merged as an
//!    ordered set so duplicates collapse to their first position.
//! 3. Truncation to `MAX_CATEGORIES`; base entries come first and are
//!    never dropped.
//!
//! Every input yields a result. Unknown triggers fall back to a single
//! default category and unknown conditions add nothing.

use serde::{Deserialize, Serialize};

use crate::checkin::types::{AfternoonState, EventType, Trigger};

/// Maximum number of categories returned by `select_categories`.
pub const MAX_CATEGORIES: usize = 2;

/// Maximum number of micro-actions suggested per check-in.
pub const MAX_RESULTS: usize = 3;

/// Back-pain score at or above which the morning pair turns spinal.
pub const BACK_PAIN_THRESHOLD: u8 = 3;

/// A class of micro-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MorningActivation,
    GentleStretch,
    SpinalMobility,
    DeskReset,
    EnergyBoost,
    Breathwork,
    WindDown,
    HydrationRecovery,
    MetabolicSupport,
    CardioMovement,
    CoreStability,
    NervousSystemReset,
}

impl Category {
    /// All categories.
    pub fn all() -> &'static [Category] {
        &[
            Category::MorningActivation,
            Category::GentleStretch,
            Category::SpinalMobility,
            Category::DeskReset,
            Category::EnergyBoost,
            Category::Breathwork,
            Category::WindDown,
            Category::HydrationRecovery,
            Category::MetabolicSupport,
            Category::CardioMovement,
            Category::CoreStability,
            Category::NervousSystemReset,
        ]
    }

    /// Stable snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MorningActivation => "morning_activation",
            Category::GentleStretch => "gentle_stretch",
            Category::SpinalMobility => "spinal_mobility",
            Category::DeskReset => "desk_reset",
            Category::EnergyBoost => "energy_boost",
            Category::Breathwork => "breathwork",
            Category::WindDown => "wind_down",
            Category::HydrationRecovery => "hydration_recovery",
            Category::MetabolicSupport => "metabolic_support",
            Category::CardioMovement => "cardio_movement",
            Category::CoreStability => "core_stability",
            Category::NervousSystemReset => "nervous_system_reset",
        }
    }

    /// Parse a tag, returning `None` for unknown values.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == tag.trim())
    }

    /// Human readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::MorningActivation => "Morning Activation",
            Category::GentleStretch => "Gentle Stretch",
            Category::SpinalMobility => "Spinal Mobility",
            Category::DeskReset => "Desk Reset",
            Category::EnergyBoost => "Energy Boost",
            Category::Breathwork => "Breathwork",
            Category::WindDown => "Wind Down",
            Category::HydrationRecovery => "Hydration Recovery",
            Category::MetabolicSupport => "Metabolic Support",
            Category::CardioMovement => "Cardio Movement",
            Category::CoreStability => "Core Stability",
            Category::NervousSystemReset => "Nervous System Reset",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chronic-condition label attached to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTag {
    Gout,
    Cholesterol,
    BackPain,
}

impl ConditionTag {
    pub fn all() -> &'static [ConditionTag] {
        &[
            ConditionTag::Gout,
            ConditionTag::Cholesterol,
            ConditionTag::BackPain,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionTag::Gout => "gout",
            ConditionTag::Cholesterol => "cholesterol",
            ConditionTag::BackPain => "back_pain",
        }
    }

    /// Parse a condition tag, returning `None` for tags this build does not weight.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == tag.trim())
    }

    /// Parse a list of tags, silently dropping unknown ones.
    pub fn parse_all<S: AsRef<str>>(tags: &[S]) -> Vec<Self> {
        tags.iter().filter_map(|t| Self::parse(t.as_ref())).collect()
    }

    /// Bonus categories this condition adds to the candidate set.
    pub fn bonus_categories(&self) -> &'static [Category] {
        match self {
            ConditionTag::Gout => &[Category::HydrationRecovery, Category::MetabolicSupport],
            ConditionTag::Cholesterol => &[Category::CardioMovement, Category::MetabolicSupport],
            ConditionTag::BackPain => &[Category::SpinalMobility],
        }
    }
}

impl std::fmt::Display for ConditionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs to category selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    /// What started the check-in
    pub trigger: Trigger,
    /// Conditions from the user profile
    pub conditions: Vec<ConditionTag>,
    /// Midday answer
    pub afternoon_state: Option<AfternoonState>,
    /// Logged event; used by ranking, not by selection
    pub event_type: Option<EventType>,
    /// Self-reported back pain, 0-10
    pub back_pain_score: Option<u8>,
}

impl CategoryInput {
    /// Input with only a trigger set.
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            conditions: Vec::new(),
            afternoon_state: None,
            event_type: None,
            back_pain_score: None,
        }
    }

    pub fn with_conditions(mut self, conditions: Vec<ConditionTag>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_afternoon_state(mut self, state: AfternoonState) -> Self {
        self.afternoon_state = Some(state);
        self
    }

    pub fn with_event(mut self, event: EventType) -> Self {
        self.event_type = Some(event);
        self
    }

    pub fn with_back_pain(mut self, score: u8) -> Self {
        self.back_pain_score = Some(score);
        self
    }
}

/// Result of category selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelection {
    /// Prioritized, deduplicated categories (at most `MAX_CATEGORIES`)
    pub categories: Vec<Category>,
    /// Maximum number of actions to suggest
    pub max_results: usize,
}

impl CategorySelection {
    /// Priority of a category within this selection (0 = highest).
    pub fn priority_of(&self, category: Category) -> Option<usize> {
        self.categories.iter().position(|c| *c == category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Base categories from the trigger table.
pub fn base_categories(input: &CategoryInput) -> Vec<Category> {
    match input.trigger {
        Trigger::Morning => {
            if input.back_pain_score.unwrap_or(0) >= BACK_PAIN_THRESHOLD {
                vec![Category::SpinalMobility, Category::GentleStretch]
            } else {
                vec![Category::MorningActivation, Category::GentleStretch]
            }
        }
        Trigger::Midday => match input.afternoon_state {
            Some(AfternoonState::BackTight) => vec![Category::SpinalMobility, Category::DeskReset],
            Some(AfternoonState::Sluggish) => vec![Category::EnergyBoost, Category::DeskReset],
            Some(AfternoonState::Stressed) => vec![Category::Breathwork, Category::DeskReset],
            Some(AfternoonState::Other) | None => {
                vec![Category::DeskReset, Category::GentleStretch]
            }
        },
        Trigger::PostEvent => vec![Category::HydrationRecovery, Category::NervousSystemReset],
        Trigger::PreSleep => vec![Category::WindDown, Category::Breathwork],
        Trigger::Other => vec![Category::GentleStretch],
    }
}

/// Base categories followed by condition bonuses, as an ordered set.
pub fn candidate_categories(input: &CategoryInput) -> Vec<Category> {
    let mut candidates = base_categories(input);

    for condition in &input.conditions {
        for bonus in condition.bonus_categories() {
            if !candidates.contains(bonus) {
                candidates.push(*bonus);
            }
        }
    }

    candidates
}

/// Select the prioritized categories and result cap for a check-in.
pub fn select_categories(input: &CategoryInput) -> CategorySelection {
    let mut categories = candidate_categories(input);
    categories.truncate(MAX_CATEGORIES);

    tracing::debug!(
        trigger = %input.trigger,
        conditions = input.conditions.len(),
        selected = ?categories,
        "Selected check-in categories"
    );

    CategorySelection {
        categories,
        max_results: MAX_RESULTS,
    }
}
