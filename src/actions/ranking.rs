//! Rank micro-actions against a category selection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::categories::{CategorySelection, ConditionTag};
use super::types::MicroAction;
use crate::checkin::types::{EventType, Trigger};

/// Context used to order candidate actions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankingContext {
    /// Trigger of the check-in
    pub trigger: Option<Trigger>,
    /// Logged event, if any
    pub event_type: Option<EventType>,
    /// Conditions from the user profile
    pub conditions: Vec<ConditionTag>,
    /// Actions to leave out (e.g. suggested recently)
    pub exclude: Vec<Uuid>,
}

impl RankingContext {
    fn matches_context(&self, action: &MicroAction) -> bool {
        let trigger_match = self
            .trigger
            .map(|t| action.has_context(t.as_str()))
            .unwrap_or(false);
        let event_match = self
            .event_type
            .map(|e| action.has_context(e.as_str()))
            .unwrap_or(false);
        trigger_match || event_match
    }
}

/// Filter `actions` to the selected categories and return the best
/// `selection.max_results` of them.
pub fn rank_actions(
    selection: &CategorySelection,
    actions: &[MicroAction],
    context: &RankingContext,
) -> Vec<MicroAction> {
    let mut candidates: Vec<(usize, bool, usize, &MicroAction)> = actions
        .iter()
        .filter(|a| a.is_active)
        .filter(|a| !context.exclude.contains(&a.id))
        .filter_map(|a| {
            selection.priority_of(a.category).map(|priority| {
                (
                    priority,
                    context.matches_context(a),
                    a.condition_matches(&context.conditions),
                    a,
                )
            })
        })
        .collect();

    candidates.sort_by(|a, b| compare_candidates(a, b));

    let ranked: Vec<MicroAction> = candidates
        .into_iter()
        .take(selection.max_results)
        .map(|(_, _, _, action)| action.clone())
        .collect();

    tracing::debug!(
        available = actions.len(),
        ranked = ranked.len(),
        "Ranked micro-actions"
    );

    ranked
}

fn compare_candidates(
    a: &(usize, bool, usize, &MicroAction),
    b: &(usize, bool, usize, &MicroAction),
) -> Ordering {
    a.0.cmp(&b.0)
        .then_with(|| b.1.cmp(&a.1))
        .then_with(|| b.2.cmp(&a.2))
        .then_with(|| a.3.duration_seconds.cmp(&b.3.duration_seconds))
        .then_with(|| a.3.title.cmp(&b.3.title))
}
