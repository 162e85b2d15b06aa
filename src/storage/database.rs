//! Database operations using rusqlite.
//!
//! `Database` owns the connection, applies the schema on open and holds the
//! user profile and check-in CRUD. The other stores borrow its connection.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::actions::categories::{Category, ConditionTag};
use crate::checkin::types::{AfternoonState, CheckIn, EventType, Trigger};
use crate::recovery::duration::Intensity;
use crate::storage::config::UserProfile;
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use crate::subscription::types::{FeatureUsage, MeteredFeature};

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        tracing::debug!("Opened database at {}", path.display());
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        // Create schema version table
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version > CURRENT_VERSION {
            return Err(DatabaseError::MigrationFailed(format!(
                "database schema version {} is newer than supported {}",
                current_version, CURRENT_VERSION
            )));
        }

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    ///
    /// Statements run through this `Database` or its stores while the
    /// transaction is alive are part of it. Dropping it without `commit`
    /// rolls them back.
    pub fn transaction(&self) -> Result<rusqlite::Transaction<'_>, DatabaseError> {
        self.conn
            .unchecked_transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }

    /// Commit a transaction started with [`Database::transaction`].
    pub fn commit(tx: rusqlite::Transaction<'_>) -> Result<(), DatabaseError> {
        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }

    // ========== User Profile CRUD Operations ==========

    /// Insert a new user profile into the database.
    pub fn insert_user(&self, profile: &UserProfile) -> Result<(), DatabaseError> {
        let conditions_json = serde_json::to_string(&profile.conditions)?;

        self.conn
            .execute(
                "INSERT INTO users (id, name, conditions_json, free_scenario_uses,
                 free_post_event_uses, free_brief_reads, onboarding_complete, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    profile.id.to_string(),
                    profile.name,
                    conditions_json,
                    profile.usage.free_scenario_uses,
                    profile.usage.free_post_event_uses,
                    profile.usage.free_brief_reads,
                    profile.onboarding_complete as i32,
                    format_timestamp(&profile.created_at),
                    format_timestamp(&profile.updated_at),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Get a user profile by ID.
    pub fn get_user(&self, id: &Uuid) -> Result<Option<UserProfile>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))?;

        let result = stmt.query_row(params![id.to_string()], UserProfileRow::from_row);

        match result {
            Ok(row) => Ok(Some(row.into_user_profile()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Get all user profiles, newest first.
    pub fn list_users(&self) -> Result<Vec<UserProfile>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))?;

        let rows = stmt.query_map([], UserProfileRow::from_row)?;

        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(row?.into_user_profile()?);
        }

        Ok(profiles)
    }

    /// Get the first (default) user profile.
    pub fn get_default_user(&self) -> Result<Option<UserProfile>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC LIMIT 1"
        ))?;

        match stmt.query_row([], UserProfileRow::from_row) {
            Ok(row) => Ok(Some(row.into_user_profile()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Update name, conditions and onboarding state of an existing profile.
    ///
    /// Usage counters are only changed through `increment_usage`.
    pub fn update_user(&self, profile: &UserProfile) -> Result<(), DatabaseError> {
        let conditions_json = serde_json::to_string(&profile.conditions)?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE users SET name = ?2, conditions_json = ?3, onboarding_complete = ?4,
                 updated_at = ?5 WHERE id = ?1",
                params![
                    profile.id.to_string(),
                    profile.name,
                    conditions_json,
                    profile.onboarding_complete as i32,
                    format_timestamp(&profile.updated_at),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("User {}", profile.id)));
        }

        Ok(())
    }

    /// Delete a user profile by ID. Check-ins, protocols, subscription and
    /// briefs cascade.
    pub fn delete_user(&self, id: &Uuid) -> Result<(), DatabaseError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("User {}", id)));
        }

        Ok(())
    }

    /// Count users in the database.
    pub fn count_users(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    /// Get or create a default user profile.
    pub fn get_or_create_default_user(&self) -> Result<UserProfile, DatabaseError> {
        if let Some(user) = self.get_default_user()? {
            return Ok(user);
        }

        let profile = UserProfile::default();
        self.insert_user(&profile)?;
        tracing::info!("Created default user {}", profile.id);
        Ok(profile)
    }

    /// Consume one free use of a metered feature and return the new counters.
    pub fn increment_usage(
        &self,
        user_id: &Uuid,
        feature: MeteredFeature,
    ) -> Result<FeatureUsage, DatabaseError> {
        let column = feature.column();
        let rows_affected = self.conn.execute(
            &format!(
                "UPDATE users SET {column} = {column} + 1, updated_at = ?2 WHERE id = ?1"
            ),
            params![user_id.to_string(), format_timestamp(&Utc::now())],
        )?;

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("User {}", user_id)));
        }

        let usage = self
            .get_user(user_id)?
            .map(|u| u.usage)
            .ok_or_else(|| DatabaseError::NotFound(format!("User {}", user_id)))?;

        tracing::debug!(user = %user_id, column, "Consumed free-tier use");
        Ok(usage)
    }

    // ========== Check-in Operations ==========

    /// Insert a submitted check-in.
    pub fn insert_checkin(&self, checkin: &CheckIn) -> Result<(), DatabaseError> {
        let categories_json = serde_json::to_string(&checkin.categories)?;
        let action_ids_json = serde_json::to_string(&checkin.suggested_action_ids)?;

        self.conn
            .execute(
                "INSERT INTO checkins (id, user_id, trigger_kind, afternoon_state, event_type,
                 intensity, back_pain_score, categories_json, suggested_action_ids_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    checkin.id.to_string(),
                    checkin.user_id.to_string(),
                    checkin.trigger.as_str(),
                    checkin.afternoon_state.map(|s| s.as_str()),
                    checkin.event_type.map(|e| e.as_str()),
                    checkin.intensity.map(|i| i.as_str()),
                    checkin.back_pain_score,
                    categories_json,
                    action_ids_json,
                    format_timestamp(&checkin.created_at),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Get a check-in by ID.
    pub fn get_checkin(&self, id: &Uuid) -> Result<Option<CheckIn>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHECKIN_COLUMNS} FROM checkins WHERE id = ?1"
        ))?;

        match stmt.query_row(params![id.to_string()], CheckInRow::from_row) {
            Ok(row) => Ok(Some(row.into_checkin()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// List a user's check-ins, newest first.
    pub fn list_checkins(
        &self,
        user_id: &Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<CheckIn>, DatabaseError> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHECKIN_COLUMNS} FROM checkins WHERE user_id = ?1
             ORDER BY created_at DESC LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![user_id.to_string(), limit], CheckInRow::from_row)?;
        collect_checkins(rows)
    }

    /// List a user's check-ins with `from <= created_at < to`, oldest first.
    pub fn list_checkins_between(
        &self,
        user_id: &Uuid,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
    ) -> Result<Vec<CheckIn>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHECKIN_COLUMNS} FROM checkins
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
             ORDER BY created_at ASC"
        ))?;

        let rows = stmt.query_map(
            params![
                user_id.to_string(),
                format_timestamp(from),
                format_timestamp(to)
            ],
            CheckInRow::from_row,
        )?;
        collect_checkins(rows)
    }

    /// IDs of actions suggested to a user since `since`.
    pub fn recent_suggested_action_ids(
        &self,
        user_id: &Uuid,
        since: &DateTime<Utc>,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT suggested_action_ids_json FROM checkins
             WHERE user_id = ?1 AND created_at >= ?2",
        )?;

        let rows = stmt.query_map(
            params![user_id.to_string(), format_timestamp(since)],
            |row| row.get::<_, String>(0),
        )?;

        let mut ids: Vec<Uuid> = Vec::new();
        for row in rows {
            let batch: Vec<Uuid> = serde_json::from_str(&row?).map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid action ids JSON: {}", e))
            })?;
            for id in batch {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        Ok(ids)
    }

    /// Count a user's check-ins.
    pub fn count_checkins(&self, user_id: &Uuid) -> Result<usize, DatabaseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM checkins WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }
}

const USER_COLUMNS: &str = "id, name, conditions_json, free_scenario_uses, free_post_event_uses, \
     free_brief_reads, onboarding_complete, created_at, updated_at";

const CHECKIN_COLUMNS: &str = "id, user_id, trigger_kind, afternoon_state, event_type, intensity, \
     back_pain_score, categories_json, suggested_action_ids_json, created_at";

fn collect_checkins<F>(
    rows: rusqlite::MappedRows<'_, F>,
) -> Result<Vec<CheckIn>, DatabaseError>
where
    F: FnMut(&rusqlite::Row<'_>) -> SqliteResult<CheckInRow>,
{
    let mut checkins = Vec::new();
    for row in rows {
        checkins.push(row?.into_checkin()?);
    }
    Ok(checkins)
}

/// Format a timestamp for storage. Fixed-width UTC so text ordering matches
/// time ordering.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
pub(crate) fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid {}: {}", field, e)))
}

/// Parse a stored UUID.
pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value)
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid UUID: {}", e)))
}

/// Intermediate struct for reading user profile rows from database.
struct UserProfileRow {
    id: String,
    name: String,
    conditions_json: String,
    free_scenario_uses: u32,
    free_post_event_uses: u32,
    free_brief_reads: u32,
    onboarding_complete: i32,
    created_at: String,
    updated_at: String,
}

impl UserProfileRow {
    fn from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            conditions_json: row.get(2)?,
            free_scenario_uses: row.get(3)?,
            free_post_event_uses: row.get(4)?,
            free_brief_reads: row.get(5)?,
            onboarding_complete: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_user_profile(self) -> Result<UserProfile, DatabaseError> {
        // Stored as plain strings so tags unknown to this build are skipped
        let raw_conditions: Vec<String> =
            serde_json::from_str(&self.conditions_json).map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid conditions JSON: {}", e))
            })?;

        Ok(UserProfile {
            id: parse_uuid(&self.id)?,
            name: self.name,
            conditions: ConditionTag::parse_all(&raw_conditions),
            usage: FeatureUsage {
                free_scenario_uses: self.free_scenario_uses,
                free_post_event_uses: self.free_post_event_uses,
                free_brief_reads: self.free_brief_reads,
            },
            onboarding_complete: self.onboarding_complete != 0,
            created_at: parse_timestamp(&self.created_at, "created date")?,
            updated_at: parse_timestamp(&self.updated_at, "updated date")?,
        })
    }
}

/// Intermediate struct for reading check-in rows from database.
struct CheckInRow {
    id: String,
    user_id: String,
    trigger: String,
    afternoon_state: Option<String>,
    event_type: Option<String>,
    intensity: Option<String>,
    back_pain_score: Option<u8>,
    categories_json: String,
    suggested_action_ids_json: String,
    created_at: String,
}

impl CheckInRow {
    fn from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            trigger: row.get(2)?,
            afternoon_state: row.get(3)?,
            event_type: row.get(4)?,
            intensity: row.get(5)?,
            back_pain_score: row.get(6)?,
            categories_json: row.get(7)?,
            suggested_action_ids_json: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn into_checkin(self) -> Result<CheckIn, DatabaseError> {
        let categories: Vec<Category> =
            serde_json::from_str(&self.categories_json).map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid categories JSON: {}", e))
            })?;

        let suggested_action_ids: Vec<Uuid> = serde_json::from_str(&self.suggested_action_ids_json)
            .map_err(|e| {
                DatabaseError::DeserializationError(format!("Invalid action ids JSON: {}", e))
            })?;

        let intensity = self
            .intensity
            .map(|name| {
                Intensity::parse(&name).ok_or_else(|| {
                    DatabaseError::DeserializationError(format!("Invalid intensity: {}", name))
                })
            })
            .transpose()?;

        Ok(CheckIn {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            trigger: Trigger::from_name(&self.trigger),
            afternoon_state: self.afternoon_state.as_deref().map(AfternoonState::from_name),
            event_type: self.event_type.as_deref().map(EventType::from_name),
            intensity,
            back_pain_score: self.back_pain_score,
            categories,
            suggested_action_ids,
            created_at: parse_timestamp(&self.created_at, "check-in date")?,
        })
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::SerializationError(err.to_string())
    }
}
