//! Reading weekly briefs through the free-tier gate.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::compose::{compose_weekly_brief, week_bounds, week_start_for, WeeklyBrief};
use crate::storage::brief_store::BriefStore;
use crate::storage::database::{Database, DatabaseError};
use crate::storage::recovery_store::RecoveryStore;
use crate::storage::subscription_store::SubscriptionStore;
use crate::subscription::gating::{can_read_weekly_brief, FreeTier, GateReason};
use crate::subscription::types::MeteredFeature;

/// Serves weekly briefs for a user.
pub struct BriefService<'a> {
    db: &'a Database,
    tier: FreeTier,
}

impl<'a> BriefService<'a> {
    pub fn new(db: &'a Database, tier: FreeTier) -> Self {
        Self { db, tier }
    }

    /// Open the brief for the week containing `week_start`.
    ///
    /// Re-opening a brief that was already read is always allowed and never
    /// consumes a free read. While the week is still open the brief is
    /// recomposed on every read, keeping its id and first read time.
    pub fn read(
        &self,
        user_id: &Uuid,
        week_start: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<WeeklyBrief, BriefError> {
        let profile = self
            .db
            .get_user(user_id)?
            .ok_or(BriefError::ProfileNotFound(*user_id))?;

        let week_start = week_start_for(week_start);
        let briefs = BriefStore::new(self.db.connection());

        let existing = briefs.get(user_id, week_start)?;
        if existing.as_ref().is_some_and(|b| b.is_read()) {
            let tx = self.db.transaction()?;
            let brief = self.current(&briefs, existing, user_id, week_start, now)?;
            Database::commit(tx)?;
            return Ok(brief);
        }

        let subscription = SubscriptionStore::new(self.db.connection()).get_for_user(user_id)?;
        let gate = can_read_weekly_brief(subscription.as_ref(), &profile.usage, &self.tier);
        if !gate.allowed {
            let reason = gate.reason.unwrap_or(GateReason::FreeLimit);
            tracing::info!(user = %user_id, reason = reason.as_str(), "Weekly brief gated");
            return Err(BriefError::Gated(reason));
        }

        let tx = self.db.transaction()?;
        let mut brief = self.current(&briefs, existing, user_id, week_start, now)?;
        briefs.mark_read(&brief.id, now)?;
        brief.read_at = Some(now);

        if gate.remaining_uses.is_some() {
            self.db.increment_usage(user_id, MeteredFeature::BriefRead)?;
        }
        Database::commit(tx)?;

        tracing::info!(user = %user_id, week = %week_start, "Weekly brief read");
        Ok(brief)
    }

    /// The stored brief, recomposed and saved if its week has not ended.
    fn current(
        &self,
        briefs: &BriefStore<'_>,
        existing: Option<WeeklyBrief>,
        user_id: &Uuid,
        week_start: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<WeeklyBrief, BriefError> {
        let (_, week_end) = week_bounds(week_start);
        let brief = match existing {
            Some(stored) if now >= week_end => return Ok(stored),
            Some(stored) => {
                let fresh = self.compose(user_id, week_start, now)?;
                WeeklyBrief {
                    id: stored.id,
                    created_at: stored.created_at,
                    read_at: stored.read_at,
                    ..fresh
                }
            }
            None => self.compose(user_id, week_start, now)?,
        };
        briefs.upsert(&brief)?;
        Ok(brief)
    }

    /// Compose a brief from stored records without gating or persisting it.
    pub fn compose(
        &self,
        user_id: &Uuid,
        week_start: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<WeeklyBrief, BriefError> {
        let week_start = week_start_for(week_start);
        let (start, end) = week_bounds(week_start);

        let checkins = self.db.list_checkins_between(user_id, &start, &end)?;
        let protocols = RecoveryStore::new(self.db.connection()).list_for_user(user_id)?;

        Ok(compose_weekly_brief(
            *user_id, week_start, &checkins, &protocols, now,
        ))
    }
}

/// Weekly brief errors.
#[derive(Debug, thiserror::Error)]
pub enum BriefError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Weekly brief unavailable: {0}")]
    Gated(GateReason),
}
