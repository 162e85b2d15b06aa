//! Subscriptions and free-tier feature gating.

pub mod gating;
pub mod types;

pub use gating::{
    can_invite_household_member, can_read_weekly_brief, can_start_post_event_checkin,
    can_view_condition_insights, can_view_scenario, check_metered, gate_report, FreeTier,
    GateReason, GateReport, GateResult,
};
pub use types::{FeatureUsage, MeteredFeature, Plan, Subscription, SubscriptionStatus};
