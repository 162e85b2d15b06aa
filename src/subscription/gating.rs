//! Feature gating against subscription state and free-tier usage.
//!
//! Each predicate is computed independently from the same two inputs: the
//! user's subscription (absent means unpaid) and their usage counters.

use serde::{Deserialize, Serialize};

use super::types::{FeatureUsage, MeteredFeature, Subscription};

/// Why a feature is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    /// Free allowance used up
    FreeLimit,
    /// Requires a paid plan
    PaidOnly,
    /// Requires the household plan
    HouseholdOnly,
}

impl GateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateReason::FreeLimit => "free_limit",
            GateReason::PaidOnly => "paid_only",
            GateReason::HouseholdOnly => "household_only",
        }
    }
}

impl std::fmt::Display for GateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a gating check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateResult {
    pub allowed: bool,
    pub reason: Option<GateReason>,
    /// Remaining free uses; `None` when unlimited
    pub remaining_uses: Option<u32>,
}

impl GateResult {
    fn unlimited() -> Self {
        Self {
            allowed: true,
            reason: None,
            remaining_uses: None,
        }
    }

    fn denied(reason: GateReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            remaining_uses: Some(0),
        }
    }
}

/// Free-tier allowances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeTier {
    /// Scenario previews
    pub scenario_views: u32,
    /// Post-event check-ins
    pub post_event_checkins: u32,
    /// Weekly brief reads
    pub brief_reads: u32,
}

impl Default for FreeTier {
    fn default() -> Self {
        Self {
            scenario_views: 1,
            post_event_checkins: 2,
            brief_reads: 1,
        }
    }
}

impl FreeTier {
    /// Allowance for a metered feature.
    pub fn allowance(&self, feature: MeteredFeature) -> u32 {
        match feature {
            MeteredFeature::ScenarioView => self.scenario_views,
            MeteredFeature::PostEventCheckin => self.post_event_checkins,
            MeteredFeature::BriefRead => self.brief_reads,
        }
    }
}

fn is_paid(subscription: Option<&Subscription>) -> bool {
    subscription.map(Subscription::is_paid).unwrap_or(false)
}

/// Gate a metered feature: paid users are unlimited, everyone else gets
/// the free allowance.
pub fn check_metered(
    feature: MeteredFeature,
    subscription: Option<&Subscription>,
    usage: &FeatureUsage,
    tier: &FreeTier,
) -> GateResult {
    if is_paid(subscription) {
        return GateResult::unlimited();
    }

    let remaining = tier.allowance(feature).saturating_sub(feature.used(usage));
    if remaining > 0 {
        GateResult {
            allowed: true,
            reason: None,
            remaining_uses: Some(remaining),
        }
    } else {
        GateResult::denied(GateReason::FreeLimit)
    }
}

pub fn can_view_scenario(
    subscription: Option<&Subscription>,
    usage: &FeatureUsage,
    tier: &FreeTier,
) -> GateResult {
    check_metered(MeteredFeature::ScenarioView, subscription, usage, tier)
}

pub fn can_start_post_event_checkin(
    subscription: Option<&Subscription>,
    usage: &FeatureUsage,
    tier: &FreeTier,
) -> GateResult {
    check_metered(MeteredFeature::PostEventCheckin, subscription, usage, tier)
}

pub fn can_read_weekly_brief(
    subscription: Option<&Subscription>,
    usage: &FeatureUsage,
    tier: &FreeTier,
) -> GateResult {
    check_metered(MeteredFeature::BriefRead, subscription, usage, tier)
}

/// Condition insights are only available on paid plans.
pub fn can_view_condition_insights(subscription: Option<&Subscription>) -> GateResult {
    if is_paid(subscription) {
        GateResult::unlimited()
    } else {
        GateResult::denied(GateReason::PaidOnly)
    }
}

/// Inviting household members requires the household plan.
pub fn can_invite_household_member(subscription: Option<&Subscription>) -> GateResult {
    match subscription {
        Some(sub) if sub.is_household() => GateResult::unlimited(),
        _ => GateResult::denied(GateReason::HouseholdOnly),
    }
}

/// Every gate for a user, keyed by feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReport {
    pub scenario: GateResult,
    pub post_event_checkin: GateResult,
    pub weekly_brief: GateResult,
    pub condition_insights: GateResult,
    pub household_invite: GateResult,
}

pub fn gate_report(
    subscription: Option<&Subscription>,
    usage: &FeatureUsage,
    tier: &FreeTier,
) -> GateReport {
    GateReport {
        scenario: can_view_scenario(subscription, usage, tier),
        post_event_checkin: can_start_post_event_checkin(subscription, usage, tier),
        weekly_brief: can_read_weekly_brief(subscription, usage, tier),
        condition_insights: can_view_condition_insights(subscription),
        household_invite: can_invite_household_member(subscription),
    }
}
