//! Subscription and usage records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing status reported for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    #[default]
    None,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::None => "none",
        }
    }

    /// Parse a stored status. Unknown values are treated as `None`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "active" => SubscriptionStatus::Active,
            "trialing" => SubscriptionStatus::Trialing,
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" => SubscriptionStatus::Canceled,
            _ => SubscriptionStatus::None,
        }
    }

    /// Whether this status grants paid access.
    pub fn grants_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

/// Subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Individual,
    Household,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Individual => "individual",
            Plan::Household => "household",
        }
    }

    /// Parse a stored plan. Unknown values are treated as `Free`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "individual" => Plan::Individual,
            "household" => Plan::Household,
            _ => Plan::Free,
        }
    }
}

/// A user's subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Owner
    pub user_id: Uuid,
    /// Billing status
    pub status: SubscriptionStatus,
    /// Plan
    pub plan: Plan,
    /// End of the current billing period
    pub current_period_end: Option<DateTime<Utc>>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a subscription record.
    pub fn new(user_id: Uuid, status: SubscriptionStatus, plan: Plan) -> Self {
        Self {
            user_id,
            status,
            plan,
            current_period_end: None,
            updated_at: Utc::now(),
        }
    }

    /// Paid means an access-granting status on a non-free plan.
    pub fn is_paid(&self) -> bool {
        self.status.grants_access() && self.plan != Plan::Free
    }

    pub fn is_household(&self) -> bool {
        self.is_paid() && self.plan == Plan::Household
    }
}

/// Per-feature counters of free-tier uses, stored on the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureUsage {
    /// Event scenarios previewed
    pub free_scenario_uses: u32,
    /// Post-event check-ins submitted
    pub free_post_event_uses: u32,
    /// Weekly briefs read
    pub free_brief_reads: u32,
}

/// Features that consume a free-tier allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteredFeature {
    ScenarioView,
    PostEventCheckin,
    BriefRead,
}

impl MeteredFeature {
    /// Storage column holding the counter for this feature.
    pub fn column(&self) -> &'static str {
        match self {
            MeteredFeature::ScenarioView => "free_scenario_uses",
            MeteredFeature::PostEventCheckin => "free_post_event_uses",
            MeteredFeature::BriefRead => "free_brief_reads",
        }
    }

    /// Current count for this feature.
    pub fn used(&self, usage: &FeatureUsage) -> u32 {
        match self {
            MeteredFeature::ScenarioView => usage.free_scenario_uses,
            MeteredFeature::PostEventCheckin => usage.free_post_event_uses,
            MeteredFeature::BriefRead => usage.free_brief_reads,
        }
    }
}
