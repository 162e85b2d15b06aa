//! Unit tests for condition-weighted category selection.

use microreset::actions::categories::{
    base_categories, candidate_categories, select_categories, Category, CategoryInput,
    ConditionTag, MAX_CATEGORIES, MAX_RESULTS,
};
use microreset::checkin::types::{AfternoonState, EventType, Trigger};

fn all_condition_sets() -> Vec<Vec<ConditionTag>> {
    vec![
        vec![],
        vec![ConditionTag::Gout],
        vec![ConditionTag::Cholesterol],
        vec![ConditionTag::BackPain],
        vec![ConditionTag::Gout, ConditionTag::Cholesterol],
        vec![ConditionTag::Cholesterol, ConditionTag::BackPain, ConditionTag::Gout],
    ]
}

#[test]
fn test_every_trigger_yields_categories() {
    for trigger in Trigger::all() {
        for conditions in all_condition_sets() {
            let selection =
                select_categories(&CategoryInput::new(*trigger).with_conditions(conditions));
            assert!(!selection.categories.is_empty(), "{} gave nothing", trigger);
            assert!(selection.categories.len() <= MAX_CATEGORIES);
            assert_eq!(selection.max_results, MAX_RESULTS);
        }
    }
}

#[test]
fn test_unknown_trigger_falls_back_to_gentle_stretch() {
    let selection = select_categories(&CategoryInput::new(Trigger::from_name("lunch_walk")));
    assert_eq!(selection.categories, vec![Category::GentleStretch]);
}

#[test]
fn test_morning_back_pain_leads_with_spinal_mobility() {
    for score in 3..=10 {
        let input = CategoryInput::new(Trigger::Morning).with_back_pain(score);
        assert_eq!(select_categories(&input).categories[0], Category::SpinalMobility);
    }

    let mild = CategoryInput::new(Trigger::Morning).with_back_pain(2);
    assert_eq!(
        select_categories(&mild).categories[0],
        Category::MorningActivation
    );

    let unreported = CategoryInput::new(Trigger::Morning);
    assert_eq!(
        select_categories(&unreported).categories[0],
        Category::MorningActivation
    );
}

#[test]
fn test_midday_states() {
    let cases = [
        (AfternoonState::BackTight, Category::SpinalMobility),
        (AfternoonState::Sluggish, Category::EnergyBoost),
        (AfternoonState::Stressed, Category::Breathwork),
        (AfternoonState::Other, Category::DeskReset),
    ];

    for (state, first) in cases {
        let input = CategoryInput::new(Trigger::Midday).with_afternoon_state(state);
        let base = base_categories(&input);
        assert_eq!(base[0], first);
        assert!(base.contains(&Category::DeskReset));
    }

    // Unanswered midday check-in
    let base = base_categories(&CategoryInput::new(Trigger::Midday));
    assert_eq!(base[0], Category::DeskReset);
}

#[test]
fn test_no_conditions_leaves_base_unchanged() {
    for trigger in Trigger::all() {
        let input = CategoryInput::new(*trigger);
        assert_eq!(candidate_categories(&input), base_categories(&input));
    }
}

#[test]
fn test_gout_adds_hydration_and_metabolic_candidates() {
    let input = CategoryInput::new(Trigger::PreSleep).with_conditions(vec![ConditionTag::Gout]);
    let candidates = candidate_categories(&input);
    assert!(candidates.contains(&Category::HydrationRecovery));
    assert!(candidates.contains(&Category::MetabolicSupport));

    // Base categories keep priority over bonuses
    assert_eq!(
        select_categories(&input).categories,
        vec![Category::WindDown, Category::Breathwork]
    );
}

#[test]
fn test_candidates_have_no_duplicates() {
    let input = CategoryInput::new(Trigger::PostEvent)
        .with_conditions(vec![ConditionTag::Gout, ConditionTag::Cholesterol])
        .with_event(EventType::HeavyNight);
    let candidates = candidate_categories(&input);

    for (i, category) in candidates.iter().enumerate() {
        assert!(!candidates[i + 1..].contains(category));
    }
    assert_eq!(
        candidates,
        vec![
            Category::HydrationRecovery,
            Category::NervousSystemReset,
            Category::MetabolicSupport,
            Category::CardioMovement,
        ]
    );
}

#[test]
fn test_event_type_does_not_change_selection() {
    let plain = select_categories(&CategoryInput::new(Trigger::PostEvent));
    for event in EventType::all() {
        let with_event = select_categories(&CategoryInput::new(Trigger::PostEvent).with_event(*event));
        assert_eq!(with_event, plain);
    }
}

#[test]
fn test_unknown_conditions_are_dropped() {
    let parsed = ConditionTag::parse_all(&["gout", "migraine", "back_pain"]);
    assert_eq!(parsed, vec![ConditionTag::Gout, ConditionTag::BackPain]);
}
