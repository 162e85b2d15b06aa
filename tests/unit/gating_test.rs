//! Unit tests for subscription gating.

use microreset::subscription::gating::{
    can_invite_household_member, can_read_weekly_brief, can_start_post_event_checkin,
    can_view_condition_insights, can_view_scenario, gate_report, FreeTier, GateReason,
};
use microreset::subscription::types::{FeatureUsage, Plan, Subscription, SubscriptionStatus};
use uuid::Uuid;

fn subscription(status: SubscriptionStatus, plan: Plan) -> Subscription {
    Subscription::new(Uuid::new_v4(), status, plan)
}

fn usage(scenario: u32, post_event: u32, brief: u32) -> FeatureUsage {
    FeatureUsage {
        free_scenario_uses: scenario,
        free_post_event_uses: post_event,
        free_brief_reads: brief,
    }
}

#[test]
fn test_free_scenario_allowance() {
    let tier = FreeTier::default();

    let fresh = can_view_scenario(None, &usage(0, 0, 0), &tier);
    assert!(fresh.allowed);
    assert_eq!(fresh.remaining_uses, Some(1));

    let used = can_view_scenario(None, &usage(1, 0, 0), &tier);
    assert!(!used.allowed);
    assert_eq!(used.reason, Some(GateReason::FreeLimit));
    assert_eq!(used.remaining_uses, Some(0));
}

#[test]
fn test_post_event_allowance_counts_down() {
    let tier = FreeTier::default();
    let remaining: Vec<Option<u32>> = (0..3)
        .map(|n| can_start_post_event_checkin(None, &usage(0, n, 0), &tier).remaining_uses)
        .collect();
    assert_eq!(remaining, vec![Some(2), Some(1), Some(0)]);
}

#[test]
fn test_paid_users_are_unlimited() {
    let tier = FreeTier::default();
    let heavy_usage = usage(50, 50, 50);

    for status in [SubscriptionStatus::Active, SubscriptionStatus::Trialing] {
        for plan in [Plan::Individual, Plan::Household] {
            let sub = subscription(status, plan);
            let gate = can_view_scenario(Some(&sub), &heavy_usage, &tier);
            assert!(gate.allowed);
            assert_eq!(gate.remaining_uses, None);
            assert!(can_read_weekly_brief(Some(&sub), &heavy_usage, &tier).allowed);
            assert!(can_view_condition_insights(Some(&sub)).allowed);
        }
    }
}

#[test]
fn test_lapsed_or_free_plans_are_unpaid() {
    let tier = FreeTier::default();
    let lapsed = [
        subscription(SubscriptionStatus::PastDue, Plan::Individual),
        subscription(SubscriptionStatus::Canceled, Plan::Household),
        subscription(SubscriptionStatus::None, Plan::Individual),
        subscription(SubscriptionStatus::Active, Plan::Free),
    ];

    for sub in &lapsed {
        assert!(!sub.is_paid());
        let insights = can_view_condition_insights(Some(sub));
        assert_eq!(insights.reason, Some(GateReason::PaidOnly));
        assert!(!can_view_scenario(Some(sub), &usage(1, 0, 0), &tier).allowed);
    }
}

#[test]
fn test_household_invite_needs_household_plan() {
    assert_eq!(
        can_invite_household_member(None).reason,
        Some(GateReason::HouseholdOnly)
    );
    assert!(!can_invite_household_member(Some(&subscription(
        SubscriptionStatus::Active,
        Plan::Individual
    )))
    .allowed);
    assert!(can_invite_household_member(Some(&subscription(
        SubscriptionStatus::Trialing,
        Plan::Household
    )))
    .allowed);
}

#[test]
fn test_predicates_are_independent() {
    let tier = FreeTier::default();
    let report = gate_report(None, &usage(1, 0, 0), &tier);

    assert!(!report.scenario.allowed);
    assert!(report.post_event_checkin.allowed);
    assert!(report.weekly_brief.allowed);
    assert!(!report.condition_insights.allowed);
    assert!(!report.household_invite.allowed);
}

#[test]
fn test_custom_tier() {
    let tier = FreeTier {
        scenario_views: 3,
        ..FreeTier::default()
    };
    assert_eq!(
        can_view_scenario(None, &usage(1, 0, 0), &tier).remaining_uses,
        Some(2)
    );
}

#[test]
fn test_gate_result_serializes_camel_case() {
    let gate = can_view_scenario(None, &usage(1, 0, 0), &FreeTier::default());
    let json = serde_json::to_value(gate).unwrap();
    assert_eq!(json["allowed"], false);
    assert_eq!(json["reason"], "free_limit");
    assert_eq!(json["remainingUses"], 0);

    let paid = Subscription::new(Uuid::new_v4(), SubscriptionStatus::Active, Plan::Individual);
    let unlimited = can_view_scenario(Some(&paid), &usage(1, 0, 0), &FreeTier::default());
    assert!(serde_json::to_value(unlimited).unwrap()["remainingUses"].is_null());
}
