//! Built-in micro-action library.
//!
//! Seeds the store on first run and serves as the ranking pool when the
//! store holds no actions. IDs are fixed so re-seeding is idempotent.

use uuid::Uuid;

use super::categories::{Category, ConditionTag};
use super::types::MicroAction;

const fn builtin_id(n: u128) -> Uuid {
    Uuid::from_u128(0x6d72_0000_0000_4000_8000_0000_0000_0000 | n)
}

/// All built-in micro-actions. Every category has at least one entry.
pub fn builtin_actions() -> Vec<MicroAction> {
    vec![
        // Morning activation
        MicroAction::with_id(builtin_id(1), "Sunlight and Water", Category::MorningActivation, 120)
            .with_instructions("Drink a glass of water next to a window or outside for two minutes.")
            .with_context_tags(&["morning"]),
        MicroAction::with_id(builtin_id(2), "Ten Bodyweight Squats", Category::MorningActivation, 90)
            .with_instructions("Feet shoulder-width apart, sit back slowly, stand tall. Ten reps.")
            .with_context_tags(&["morning"]),
        // Gentle stretch
        MicroAction::with_id(builtin_id(3), "Standing Side Reach", Category::GentleStretch, 60)
            .with_instructions("Reach one arm overhead and lean away. Five breaths each side."),
        MicroAction::with_id(builtin_id(4), "Hamstring Fold", Category::GentleStretch, 90)
            .with_instructions("Soft knees, fold forward and let the head hang. Sway gently.")
            .with_context_tags(&["morning"]),
        // Spinal mobility
        MicroAction::with_id(builtin_id(5), "Cat-Cow", Category::SpinalMobility, 90)
            .with_instructions("On hands and knees, alternate arching and rounding the back. Ten slow cycles.")
            .with_context_tags(&["morning"])
            .with_condition_tags(vec![ConditionTag::BackPain]),
        MicroAction::with_id(builtin_id(6), "Seated Twist", Category::SpinalMobility, 60)
            .with_instructions("Sit tall, rotate toward the chair back, hold five breaths each side.")
            .with_context_tags(&["midday", "long_desk"])
            .with_condition_tags(vec![ConditionTag::BackPain]),
        // Desk reset
        MicroAction::with_id(builtin_id(7), "Neck and Shoulder Rolls", Category::DeskReset, 60)
            .with_instructions("Five slow rolls each direction, then drop the shoulders away from the ears.")
            .with_context_tags(&["midday", "long_desk"]),
        MicroAction::with_id(builtin_id(8), "Stand and Walk Two Minutes", Category::DeskReset, 120)
            .with_instructions("Leave the desk and walk at an easy pace. No phone.")
            .with_context_tags(&["midday", "long_desk", "travel"]),
        // Energy boost
        MicroAction::with_id(builtin_id(9), "Stair Climb", Category::EnergyBoost, 120)
            .with_instructions("Two flights up and down at a brisk pace.")
            .with_context_tags(&["midday"]),
        // Breathwork
        MicroAction::with_id(builtin_id(10), "Box Breathing", Category::Breathwork, 120)
            .with_instructions("Inhale four, hold four, exhale four, hold four. Six rounds.")
            .with_context_tags(&["midday", "pre_sleep"]),
        MicroAction::with_id(builtin_id(11), "Long Exhale", Category::Breathwork, 90)
            .with_instructions("Inhale for four, exhale for eight. Eight rounds.")
            .with_context_tags(&["pre_sleep"]),
        // Wind down
        MicroAction::with_id(builtin_id(12), "Screens Off", Category::WindDown, 60)
            .with_instructions("Put the phone on charge outside the bedroom and dim the lights.")
            .with_context_tags(&["pre_sleep"]),
        MicroAction::with_id(builtin_id(13), "Legs Up the Wall", Category::WindDown, 300)
            .with_instructions("Lie down with legs resting against a wall. Breathe slowly for five minutes.")
            .with_context_tags(&["pre_sleep", "travel"]),
        // Hydration recovery
        MicroAction::with_id(builtin_id(14), "Electrolyte Glass", Category::HydrationRecovery, 60)
            .with_instructions("Drink a full glass of water with electrolytes before coffee.")
            .with_context_tags(&["post_event", "heavy_night"]),
        MicroAction::with_id(builtin_id(15), "Water Before Every Coffee", Category::HydrationRecovery, 30)
            .with_instructions("Match every coffee today with a glass of water.")
            .with_condition_tags(vec![ConditionTag::Gout]),
        // Metabolic support
        MicroAction::with_id(builtin_id(16), "Post-Meal Walk", Category::MetabolicSupport, 600)
            .with_instructions("Walk for ten minutes within half an hour of eating.")
            .with_condition_tags(vec![ConditionTag::Gout, ConditionTag::Cholesterol]),
        // Cardio movement
        MicroAction::with_id(builtin_id(17), "Brisk Block Loop", Category::CardioMovement, 600)
            .with_instructions("Walk around the block fast enough that talking takes effort.")
            .with_condition_tags(vec![ConditionTag::Cholesterol]),
        // Core stability
        MicroAction::with_id(builtin_id(18), "Dead Bug", Category::CoreStability, 90)
            .with_instructions("On your back, extend opposite arm and leg slowly. Eight per side.")
            .with_condition_tags(vec![ConditionTag::BackPain]),
        // Nervous system reset
        MicroAction::with_id(builtin_id(19), "Cold Water Face Splash", Category::NervousSystemReset, 30)
            .with_instructions("Splash cold water on the face three times, then breathe slowly.")
            .with_context_tags(&["post_event", "heavy_night", "poor_sleep"]),
        MicroAction::with_id(builtin_id(20), "Body Scan", Category::NervousSystemReset, 180)
            .with_instructions("Lie still and move attention from feet to head, relaxing each area.")
            .with_context_tags(&["post_event", "poor_sleep", "travel"]),
    ]
}
