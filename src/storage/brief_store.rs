//! Weekly brief storage.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::database::{format_timestamp, parse_timestamp, parse_uuid, DatabaseError};
use crate::actions::categories::Category;
use crate::brief::compose::WeeklyBrief;

const BRIEF_COLUMNS: &str = "id, user_id, week_start, checkin_count, top_categories_json, \
     average_back_pain, protocols_completed, summary, created_at, read_at";

/// Store for weekly briefs (one per user and week).
pub struct BriefStore<'a> {
    conn: &'a Connection,
}

impl<'a> BriefStore<'a> {
    /// Create a new brief store with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a brief, replacing the content of any existing brief for the
    /// same user and week. An existing `read_at` is kept.
    pub fn upsert(&self, brief: &WeeklyBrief) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO weekly_briefs
             (id, user_id, week_start, checkin_count, top_categories_json, average_back_pain,
              protocols_completed, summary, created_at, read_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(user_id, week_start) DO UPDATE SET
              checkin_count = excluded.checkin_count,
              top_categories_json = excluded.top_categories_json,
              average_back_pain = excluded.average_back_pain,
              protocols_completed = excluded.protocols_completed,
              summary = excluded.summary,
              read_at = COALESCE(weekly_briefs.read_at, excluded.read_at)",
            params![
                brief.id.to_string(),
                brief.user_id.to_string(),
                brief.week_start.to_string(),
                brief.checkin_count,
                serde_json::to_string(&brief.top_categories)?,
                brief.average_back_pain,
                brief.protocols_completed,
                brief.summary,
                format_timestamp(&brief.created_at),
                brief.read_at.as_ref().map(format_timestamp),
            ],
        )?;
        Ok(())
    }

    /// Get the brief for a user and week.
    pub fn get(
        &self,
        user_id: &Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyBrief>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {BRIEF_COLUMNS} FROM weekly_briefs
                     WHERE user_id = ?1 AND week_start = ?2"
                ),
                params![user_id.to_string(), week_start.to_string()],
                BriefRow::from_row,
            )
            .optional()?;

        row.map(BriefRow::into_brief).transpose()
    }

    /// All briefs for a user, newest week first.
    pub fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<WeeklyBrief>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BRIEF_COLUMNS} FROM weekly_briefs
             WHERE user_id = ?1 ORDER BY week_start DESC"
        ))?;

        let rows = stmt.query_map(params![user_id.to_string()], BriefRow::from_row)?;

        let mut briefs = Vec::new();
        for row in rows {
            briefs.push(row?.into_brief()?);
        }
        Ok(briefs)
    }

    /// Stamp the first read time. Later calls leave it unchanged.
    pub fn mark_read(&self, brief_id: &Uuid, at: DateTime<Utc>) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE weekly_briefs SET read_at = COALESCE(read_at, ?2) WHERE id = ?1",
            params![brief_id.to_string(), format_timestamp(&at)],
        )?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(format!("Brief {}", brief_id)));
        }
        Ok(())
    }
}

/// Intermediate struct for reading brief rows from database.
struct BriefRow {
    id: String,
    user_id: String,
    week_start: String,
    checkin_count: u32,
    top_categories_json: String,
    average_back_pain: Option<f64>,
    protocols_completed: u32,
    summary: String,
    created_at: String,
    read_at: Option<String>,
}

impl BriefRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            week_start: row.get(2)?,
            checkin_count: row.get(3)?,
            top_categories_json: row.get(4)?,
            average_back_pain: row.get(5)?,
            protocols_completed: row.get(6)?,
            summary: row.get(7)?,
            created_at: row.get(8)?,
            read_at: row.get(9)?,
        })
    }

    fn into_brief(self) -> Result<WeeklyBrief, DatabaseError> {
        let week_start = NaiveDate::parse_from_str(&self.week_start, "%Y-%m-%d").map_err(|e| {
            DatabaseError::DeserializationError(format!("Invalid week start: {}", e))
        })?;

        let top_categories: Vec<Category> = serde_json::from_str(&self.top_categories_json)
            .map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid categories JSON: {}", e))
            })?;

        Ok(WeeklyBrief {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            week_start,
            checkin_count: self.checkin_count,
            top_categories,
            average_back_pain: self.average_back_pain.map(|v| v as f32),
            protocols_completed: self.protocols_completed,
            summary: self.summary,
            created_at: parse_timestamp(&self.created_at, "created date")?,
            read_at: self
                .read_at
                .map(|s| parse_timestamp(&s, "read date"))
                .transpose()?,
        })
    }
}
