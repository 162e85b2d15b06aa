//! Subscription storage.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::database::{format_timestamp, parse_timestamp, parse_uuid, DatabaseError};
use crate::subscription::types::{Plan, Subscription, SubscriptionStatus};

/// Store for subscriptions (one row per user).
pub struct SubscriptionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SubscriptionStore<'a> {
    /// Create a new subscription store with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace the subscription for its user.
    pub fn upsert(&self, subscription: &Subscription) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO subscriptions (user_id, status, plan, current_period_end, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
              status = excluded.status,
              plan = excluded.plan,
              current_period_end = excluded.current_period_end,
              updated_at = excluded.updated_at",
            params![
                subscription.user_id.to_string(),
                subscription.status.as_str(),
                subscription.plan.as_str(),
                subscription.current_period_end.as_ref().map(format_timestamp),
                format_timestamp(&subscription.updated_at),
            ],
        )?;

        tracing::debug!(
            user = %subscription.user_id,
            status = subscription.status.as_str(),
            plan = subscription.plan.as_str(),
            "Stored subscription"
        );
        Ok(())
    }

    /// Get the subscription for a user, if any.
    pub fn get_for_user(&self, user_id: &Uuid) -> Result<Option<Subscription>, DatabaseError> {
        let row: Option<(String, String, String, Option<String>, String)> = self
            .conn
            .query_row(
                "SELECT user_id, status, plan, current_period_end, updated_at
                 FROM subscriptions WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .optional()?;

        match row {
            Some((user_id_str, status, plan, period_end, updated_at)) => Ok(Some(Subscription {
                user_id: parse_uuid(&user_id_str)?,
                status: SubscriptionStatus::from_name(&status),
                plan: Plan::from_name(&plan),
                current_period_end: period_end
                    .map(|s| parse_timestamp(&s, "period end"))
                    .transpose()?,
                updated_at: parse_timestamp(&updated_at, "updated date")?,
            })),
            None => Ok(None),
        }
    }

    /// Remove a user's subscription. Returns whether a row was deleted.
    pub fn delete_for_user(&self, user_id: &Uuid) -> Result<bool, DatabaseError> {
        let deleted = self.conn.execute(
            "DELETE FROM subscriptions WHERE user_id = ?1",
            params![user_id.to_string()],
        )?;
        Ok(deleted > 0)
    }
}
