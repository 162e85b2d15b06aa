//! Unit tests for micro-action ranking against the built-in library.

use microreset::actions::catalog::builtin_actions;
use microreset::actions::categories::{select_categories, Category, CategoryInput, ConditionTag};
use microreset::actions::ranking::{rank_actions, RankingContext};
use microreset::actions::types::MicroAction;
use microreset::checkin::types::{EventType, Trigger};

#[test]
fn test_builtin_library_covers_every_category() {
    let library = builtin_actions();
    for category in Category::all() {
        assert!(
            library.iter().any(|a| a.category == *category),
            "no action for {}",
            category
        );
    }
}

#[test]
fn test_every_trigger_gets_suggestions() {
    let library = builtin_actions();
    for trigger in Trigger::all() {
        let selection = select_categories(&CategoryInput::new(*trigger));
        let context = RankingContext {
            trigger: Some(*trigger),
            ..Default::default()
        };
        let ranked = rank_actions(&selection, &library, &context);
        assert!(!ranked.is_empty());
        assert!(ranked.len() <= selection.max_results);
        assert!(ranked.iter().all(|a| selection.contains(a.category)));
    }
}

#[test]
fn test_higher_priority_category_first() {
    let selection = select_categories(&CategoryInput::new(Trigger::PreSleep));
    let ranked = rank_actions(&selection, &builtin_actions(), &RankingContext::default());
    assert_eq!(ranked[0].category, Category::WindDown);
}

#[test]
fn test_event_context_breaks_ties() {
    let selection = select_categories(&CategoryInput::new(Trigger::PostEvent));
    let generic = MicroAction::new("Glass of water", Category::HydrationRecovery, 30);
    let travel = MicroAction::new("Cabin water refill", Category::HydrationRecovery, 60)
        .with_context_tags(&["travel"]);
    let pool = vec![generic.clone(), travel.clone()];

    let context = RankingContext {
        trigger: Some(Trigger::PostEvent),
        event_type: Some(EventType::Travel),
        ..Default::default()
    };
    let ranked = rank_actions(&selection, &pool, &context);
    assert_eq!(ranked[0].id, travel.id);

    // Without the event the shorter action wins
    let ranked = rank_actions(&selection, &pool, &RankingContext::default());
    assert_eq!(ranked[0].id, generic.id);
}

#[test]
fn test_condition_matches_break_ties() {
    let selection = select_categories(&CategoryInput::new(Trigger::Morning));
    let plain = MicroAction::new("Arm circles", Category::MorningActivation, 60);
    let suited = MicroAction::new("Ankle pumps", Category::MorningActivation, 90)
        .with_condition_tags(vec![ConditionTag::Gout]);

    let context = RankingContext {
        conditions: vec![ConditionTag::Gout],
        ..Default::default()
    };
    let ranked = rank_actions(&selection, &[plain, suited.clone()], &context);
    assert_eq!(ranked[0].id, suited.id);
}

#[test]
fn test_excluded_and_inactive_actions_are_skipped() {
    let selection = select_categories(&CategoryInput::new(Trigger::PreSleep));
    let mut retired = MicroAction::new("Old stretch", Category::WindDown, 30);
    retired.is_active = false;
    let recent = MicroAction::new("Dim the lights", Category::WindDown, 30);
    let fresh = MicroAction::new("Four-seven-eight", Category::Breathwork, 60);

    let context = RankingContext {
        exclude: vec![recent.id],
        ..Default::default()
    };
    let ranked = rank_actions(&selection, &[retired, recent, fresh.clone()], &context);
    assert_eq!(ranked, vec![fresh]);
}
