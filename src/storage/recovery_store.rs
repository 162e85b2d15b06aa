//! Recovery protocol storage.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::database::{format_timestamp, parse_timestamp, parse_uuid, DatabaseError};
use crate::checkin::types::EventType;
use crate::recovery::duration::Intensity;
use crate::recovery::protocol::{ProtocolStatus, RecoveryProtocol};

const PROTOCOL_COLUMNS: &str = "id, user_id, event_type, intensity, label, total_days, \
     days_completed, status, started_at, completed_at";

/// Store for recovery protocols.
pub struct RecoveryStore<'a> {
    conn: &'a Connection,
}

impl<'a> RecoveryStore<'a> {
    /// Create a new recovery store with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a new protocol.
    pub fn insert(&self, protocol: &RecoveryProtocol) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO recovery_protocols
             (id, user_id, event_type, intensity, label, total_days, days_completed,
              status, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                protocol.id.to_string(),
                protocol.user_id.to_string(),
                protocol.event_type.as_str(),
                protocol.intensity.as_str(),
                protocol.label,
                protocol.total_days,
                protocol.days_completed,
                protocol.status.as_str(),
                format_timestamp(&protocol.started_at),
                protocol.completed_at.as_ref().map(format_timestamp),
            ],
        )?;
        Ok(())
    }

    /// Persist progress of an existing protocol.
    pub fn update(&self, protocol: &RecoveryProtocol) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE recovery_protocols SET days_completed = ?2, status = ?3, completed_at = ?4
             WHERE id = ?1",
            params![
                protocol.id.to_string(),
                protocol.days_completed,
                protocol.status.as_str(),
                protocol.completed_at.as_ref().map(format_timestamp),
            ],
        )?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(format!("Protocol {}", protocol.id)));
        }
        Ok(())
    }

    /// Get a protocol by ID.
    pub fn get(&self, id: &Uuid) -> Result<Option<RecoveryProtocol>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {PROTOCOL_COLUMNS} FROM recovery_protocols WHERE id = ?1"),
                params![id.to_string()],
                ProtocolRow::from_row,
            )
            .optional()?;

        row.map(ProtocolRow::into_protocol).transpose()
    }

    /// The most recently started active protocol for a user.
    pub fn active_for_user(&self, user_id: &Uuid) -> Result<Option<RecoveryProtocol>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {PROTOCOL_COLUMNS} FROM recovery_protocols
                     WHERE user_id = ?1 AND status = 'active'
                     ORDER BY started_at DESC LIMIT 1"
                ),
                params![user_id.to_string()],
                ProtocolRow::from_row,
            )
            .optional()?;

        row.map(ProtocolRow::into_protocol).transpose()
    }

    /// All protocols for a user, newest first.
    pub fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<RecoveryProtocol>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROTOCOL_COLUMNS} FROM recovery_protocols
             WHERE user_id = ?1 ORDER BY started_at DESC"
        ))?;

        let rows = stmt.query_map(params![user_id.to_string()], ProtocolRow::from_row)?;

        let mut protocols = Vec::new();
        for row in rows {
            protocols.push(row?.into_protocol()?);
        }
        Ok(protocols)
    }

    /// Advance the user's active protocol by one day and persist it.
    ///
    /// Returns `None` when the user has no active protocol.
    pub fn advance_active(
        &self,
        user_id: &Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<RecoveryProtocol>, DatabaseError> {
        let Some(mut protocol) = self.active_for_user(user_id)? else {
            return Ok(None);
        };

        protocol.advance(now);
        self.update(&protocol)?;

        if protocol.is_completed() {
            tracing::info!(protocol = %protocol.id, "Recovery protocol completed");
        }
        Ok(Some(protocol))
    }

    /// Close any active protocols for a user, e.g. when a new one replaces them.
    pub fn close_active(
        &self,
        user_id: &Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<usize, DatabaseError> {
        let closed = self.conn.execute(
            "UPDATE recovery_protocols SET status = 'completed', completed_at = ?2
             WHERE user_id = ?1 AND status = 'active'",
            params![user_id.to_string(), format_timestamp(&now)],
        )?;
        Ok(closed)
    }
}

/// Intermediate struct for reading protocol rows from database.
struct ProtocolRow {
    id: String,
    user_id: String,
    event_type: String,
    intensity: String,
    label: String,
    total_days: u32,
    days_completed: u32,
    status: String,
    started_at: String,
    completed_at: Option<String>,
}

impl ProtocolRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            event_type: row.get(2)?,
            intensity: row.get(3)?,
            label: row.get(4)?,
            total_days: row.get(5)?,
            days_completed: row.get(6)?,
            status: row.get(7)?,
            started_at: row.get(8)?,
            completed_at: row.get(9)?,
        })
    }

    fn into_protocol(self) -> Result<RecoveryProtocol, DatabaseError> {
        let intensity = Intensity::parse(&self.intensity).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Invalid intensity: {}", self.intensity))
        })?;
        let status = ProtocolStatus::parse(&self.status).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Invalid status: {}", self.status))
        })?;

        Ok(RecoveryProtocol {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            event_type: EventType::from_name(&self.event_type),
            intensity,
            label: self.label,
            total_days: self.total_days,
            days_completed: self.days_completed,
            status,
            started_at: parse_timestamp(&self.started_at, "start date")?,
            completed_at: self
                .completed_at
                .map(|s| parse_timestamp(&s, "completion date"))
                .transpose()?,
        })
    }
}
