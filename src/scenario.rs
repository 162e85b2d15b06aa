//! Event scenario preview.
//!
//! Lets a user see the recovery plan for an upcoming event before it
//! happens: the protocol label, its length and the post-event categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::categories::{select_categories, CategoryInput, CategorySelection, ConditionTag};
use crate::checkin::types::{EventType, Trigger};
use crate::recovery::duration::{protocol_label, recovery_duration, Intensity};
use crate::storage::database::{Database, DatabaseError};
use crate::storage::subscription_store::SubscriptionStore;
use crate::subscription::gating::{can_view_scenario, FreeTier, GateReason};
use crate::subscription::types::MeteredFeature;

/// What a user would face after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPreview {
    pub event_type: EventType,
    pub intensity: Intensity,
    /// Protocol label
    pub label: String,
    /// Recovery days
    pub recovery_days: u32,
    /// Categories for the post-event check-in
    pub selection: CategorySelection,
}

/// Build the preview for an event at a given intensity.
pub fn preview_scenario(
    event_type: EventType,
    intensity: Intensity,
    conditions: &[ConditionTag],
) -> ScenarioPreview {
    let input = CategoryInput::new(Trigger::PostEvent)
        .with_conditions(conditions.to_vec())
        .with_event(event_type);

    ScenarioPreview {
        event_type,
        intensity,
        label: protocol_label(event_type).to_string(),
        recovery_days: recovery_duration(event_type, intensity),
        selection: select_categories(&input),
    }
}

/// Serves scenario previews through the free-tier gate.
pub struct ScenarioService<'a> {
    db: &'a Database,
    tier: FreeTier,
}

impl<'a> ScenarioService<'a> {
    pub fn new(db: &'a Database, tier: FreeTier) -> Self {
        Self { db, tier }
    }

    /// Preview an event for a user, counting the view against the free
    /// allowance when the user is not on a paid plan.
    pub fn view(
        &self,
        user_id: &Uuid,
        event_type: EventType,
        intensity: Intensity,
    ) -> Result<ScenarioPreview, ScenarioError> {
        let profile = self
            .db
            .get_user(user_id)?
            .ok_or(ScenarioError::ProfileNotFound(*user_id))?;

        let subscription = SubscriptionStore::new(self.db.connection()).get_for_user(user_id)?;
        let gate = can_view_scenario(subscription.as_ref(), &profile.usage, &self.tier);
        if !gate.allowed {
            let reason = gate.reason.unwrap_or(GateReason::FreeLimit);
            tracing::info!(user = %user_id, reason = reason.as_str(), "Scenario preview gated");
            return Err(ScenarioError::Gated(reason));
        }

        let preview = preview_scenario(event_type, intensity, &profile.conditions);
        if gate.remaining_uses.is_some() {
            self.db.increment_usage(user_id, MeteredFeature::ScenarioView)?;
        }

        tracing::debug!(
            user = %user_id,
            event = event_type.as_str(),
            days = preview.recovery_days,
            "Scenario previewed"
        );
        Ok(preview)
    }
}

/// Scenario preview errors.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Scenario preview unavailable: {0}")]
    Gated(GateReason),
}
