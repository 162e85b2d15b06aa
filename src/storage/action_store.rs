//! Micro-action catalog storage.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::database::{parse_uuid, DatabaseError};
use crate::actions::catalog::builtin_actions;
use crate::actions::categories::{Category, ConditionTag};
use crate::actions::types::MicroAction;

const ACTION_COLUMNS: &str = "id, title, instructions, category, duration_seconds, \
     context_tags_json, condition_tags_json, is_active";

/// Store for micro-actions.
pub struct ActionStore<'a> {
    conn: &'a Connection,
}

impl<'a> ActionStore<'a> {
    /// Create a new action store with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace an action.
    pub fn upsert(&self, action: &MicroAction) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO micro_actions
             (id, title, instructions, category, duration_seconds,
              context_tags_json, condition_tags_json, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
              title = excluded.title,
              instructions = excluded.instructions,
              category = excluded.category,
              duration_seconds = excluded.duration_seconds,
              context_tags_json = excluded.context_tags_json,
              condition_tags_json = excluded.condition_tags_json,
              is_active = excluded.is_active",
            params![
                action.id.to_string(),
                action.title,
                action.instructions,
                action.category.as_str(),
                action.duration_seconds,
                serde_json::to_string(&action.context_tags)?,
                serde_json::to_string(&action.condition_tags)?,
                action.is_active as i32,
            ],
        )?;

        Ok(())
    }

    /// Get an action by ID.
    pub fn get(&self, id: &Uuid) -> Result<Option<MicroAction>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {ACTION_COLUMNS} FROM micro_actions WHERE id = ?1"),
                params![id.to_string()],
                ActionRow::from_row,
            )
            .optional()?;

        row.map(ActionRow::into_action).transpose()
    }

    /// All active actions, ordered by category then title.
    pub fn list_active(&self) -> Result<Vec<MicroAction>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACTION_COLUMNS} FROM micro_actions
             WHERE is_active = 1 ORDER BY category, title"
        ))?;

        let rows = stmt.query_map([], ActionRow::from_row)?;

        let mut actions = Vec::new();
        for row in rows {
            actions.push(row?.into_action()?);
        }
        Ok(actions)
    }

    /// Active actions in any of the given categories.
    pub fn list_by_categories(
        &self,
        categories: &[Category],
    ) -> Result<Vec<MicroAction>, DatabaseError> {
        Ok(self
            .list_active()?
            .into_iter()
            .filter(|a| categories.contains(&a.category))
            .collect())
    }

    /// Mark an action inactive. Returns false when the action does not exist.
    pub fn deactivate(&self, id: &Uuid) -> Result<bool, DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE micro_actions SET is_active = 0 WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(updated > 0)
    }

    /// Count all stored actions, active or not.
    pub fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM micro_actions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Upsert the built-in library. Returns the number of actions written.
    pub fn seed_builtin(&self) -> Result<usize, DatabaseError> {
        let actions = builtin_actions();
        for action in &actions {
            self.upsert(action)?;
        }
        tracing::info!("Seeded {} built-in micro-actions", actions.len());
        Ok(actions.len())
    }

    /// Active stored actions, or the built-in library when the store is empty.
    pub fn ranking_pool(&self) -> Result<Vec<MicroAction>, DatabaseError> {
        if self.count()? == 0 {
            tracing::debug!("Action store empty, ranking against built-in library");
            return Ok(builtin_actions());
        }
        self.list_active()
    }
}

/// Intermediate struct for reading action rows from database.
struct ActionRow {
    id: String,
    title: String,
    instructions: String,
    category: String,
    duration_seconds: u32,
    context_tags_json: String,
    condition_tags_json: String,
    is_active: i32,
}

impl ActionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            instructions: row.get(2)?,
            category: row.get(3)?,
            duration_seconds: row.get(4)?,
            context_tags_json: row.get(5)?,
            condition_tags_json: row.get(6)?,
            is_active: row.get(7)?,
        })
    }

    fn into_action(self) -> Result<MicroAction, DatabaseError> {
        let category = Category::parse(&self.category).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Unknown category: {}", self.category))
        })?;

        let context_tags: Vec<String> = serde_json::from_str(&self.context_tags_json)
            .map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid context tags JSON: {}", e))
            })?;

        let raw_conditions: Vec<String> = serde_json::from_str(&self.condition_tags_json)
            .map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid condition tags JSON: {}", e))
            })?;

        Ok(MicroAction {
            id: parse_uuid(&self.id)?,
            title: self.title,
            instructions: self.instructions,
            category,
            duration_seconds: self.duration_seconds,
            context_tags,
            condition_tags: ConditionTag::parse_all(&raw_conditions),
            is_active: self.is_active != 0,
        })
    }
}
