//! Check-in submission.
//!
//! Submitting a draft validates it, applies the post-event gate, selects
//! categories, ranks micro-actions and, for post-event check-ins, starts a
//! recovery protocol.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{CheckIn, CheckinDraft, Trigger};
use crate::actions::categories::{select_categories, CategorySelection, ConditionTag};
use crate::actions::ranking::{rank_actions, RankingContext};
use crate::actions::types::MicroAction;
use crate::recovery::protocol::RecoveryProtocol;
use crate::storage::action_store::ActionStore;
use crate::storage::config::{AppConfig, CheckinSettings};
use crate::storage::database::{Database, DatabaseError};
use crate::storage::recovery_store::RecoveryStore;
use crate::storage::subscription_store::SubscriptionStore;
use crate::subscription::gating::{can_start_post_event_checkin, FreeTier, GateReason};
use crate::subscription::types::MeteredFeature;

/// Highest accepted back-pain score.
pub const MAX_PAIN_SCORE: u8 = 10;

/// Result of a submitted check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinOutcome {
    /// The stored check-in
    pub checkin: CheckIn,
    /// Selected categories, highest priority first
    pub selection: CategorySelection,
    /// Suggested micro-actions, best first
    pub actions: Vec<MicroAction>,
    /// Protocol started by a post-event check-in
    pub protocol: Option<RecoveryProtocol>,
}

/// Submits check-ins for users.
pub struct CheckinService<'a> {
    db: &'a Database,
    settings: CheckinSettings,
    tier: FreeTier,
}

impl<'a> CheckinService<'a> {
    pub fn new(db: &'a Database, settings: CheckinSettings, tier: FreeTier) -> Self {
        Self { db, settings, tier }
    }

    /// Create a service using the check-in and free-tier sections of `config`.
    pub fn from_config(db: &'a Database, config: &AppConfig) -> Self {
        Self::new(db, config.checkin.clone(), config.free_tier)
    }

    /// Submit a draft for a user.
    pub fn submit(
        &self,
        user_id: &Uuid,
        draft: &CheckinDraft,
        now: DateTime<Utc>,
    ) -> Result<CheckinOutcome, CheckinError> {
        let trigger = draft.trigger.ok_or(CheckinError::IncompleteDraft)?;
        let profile = self
            .db
            .get_user(user_id)?
            .ok_or(CheckinError::ProfileNotFound(*user_id))?;

        if let Some(score) = draft.back_pain_score {
            if score > MAX_PAIN_SCORE {
                return Err(CheckinError::InvalidPainScore(score));
            }
        }

        let mut consumes_free_use = false;
        if trigger == Trigger::PostEvent {
            let subscription =
                SubscriptionStore::new(self.db.connection()).get_for_user(user_id)?;
            let gate =
                can_start_post_event_checkin(subscription.as_ref(), &profile.usage, &self.tier);
            if !gate.allowed {
                let reason = gate.reason.unwrap_or(GateReason::FreeLimit);
                tracing::info!(user = %user_id, reason = reason.as_str(), "Post-event check-in gated");
                return Err(CheckinError::Gated(reason));
            }
            consumes_free_use = gate.remaining_uses.is_some();
        }

        let input = draft
            .to_category_input(&profile.conditions)
            .ok_or(CheckinError::IncompleteDraft)?;
        let selection = select_categories(&input);
        let actions = self.suggest(user_id, draft, &selection, &profile.conditions, now)?;

        let tx = self.db.transaction()?;

        let protocol = match (trigger, draft.event_type) {
            (Trigger::PostEvent, Some(event)) => {
                let recovery = RecoveryStore::new(self.db.connection());
                let closed = recovery.close_active(user_id, now)?;
                if closed > 0 {
                    tracing::debug!(user = %user_id, closed, "Replaced active recovery protocol");
                }

                let protocol = RecoveryProtocol::start(
                    *user_id,
                    event,
                    draft.intensity.unwrap_or_default(),
                    now,
                );
                recovery.insert(&protocol)?;
                Some(protocol)
            }
            _ => None,
        };

        let mut checkin = CheckIn::from_draft(*user_id, trigger, draft, now);
        checkin.categories = selection.categories.clone();
        checkin.suggested_action_ids = actions.iter().map(|a| a.id).collect();
        self.db.insert_checkin(&checkin)?;

        if consumes_free_use {
            self.db
                .increment_usage(user_id, MeteredFeature::PostEventCheckin)?;
        }

        Database::commit(tx)?;

        if let Some(protocol) = &protocol {
            tracing::info!(
                user = %user_id,
                label = %protocol.label,
                days = protocol.total_days,
                "Started recovery protocol"
            );
        }

        tracing::info!(
            user = %user_id,
            trigger = trigger.as_str(),
            actions = actions.len(),
            "Check-in submitted"
        );

        Ok(CheckinOutcome {
            checkin,
            selection,
            actions,
            protocol,
        })
    }

    /// Rank the action pool, leaving out recent suggestions.
    ///
    /// When every candidate was suggested recently the exclusion is dropped
    /// so the user still gets suggestions.
    fn suggest(
        &self,
        user_id: &Uuid,
        draft: &CheckinDraft,
        selection: &CategorySelection,
        conditions: &[ConditionTag],
        now: DateTime<Utc>,
    ) -> Result<Vec<MicroAction>, CheckinError> {
        let pool = ActionStore::new(self.db.connection()).ranking_pool()?;
        let window = Duration::hours(self.settings.recent_action_window_hours as i64);
        let since = now
            .checked_sub_signed(window)
            .unwrap_or(DateTime::UNIX_EPOCH);

        let mut context = RankingContext {
            trigger: draft.trigger,
            event_type: draft.event_type,
            conditions: conditions.to_vec(),
            exclude: self.db.recent_suggested_action_ids(user_id, &since)?,
        };

        let ranked = rank_actions(selection, &pool, &context);
        if !ranked.is_empty() || context.exclude.is_empty() {
            return Ok(ranked);
        }

        tracing::debug!(user = %user_id, "All candidates suggested recently, repeating");
        context.exclude.clear();
        Ok(rank_actions(selection, &pool, &context))
    }
}

/// Check-in errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckinError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Check-in has no trigger")]
    IncompleteDraft,

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Back pain score must be 0-10, got {0}")]
    InvalidPainScore(u8),

    #[error("Check-in unavailable: {0}")]
    Gated(GateReason),
}
