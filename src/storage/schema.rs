//! Database schema definitions.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    conditions_json TEXT NOT NULL DEFAULT '[]',
    free_scenario_uses INTEGER NOT NULL DEFAULT 0,
    free_post_event_uses INTEGER NOT NULL DEFAULT 0,
    free_brief_reads INTEGER NOT NULL DEFAULT 0,
    onboarding_complete INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Check-ins table
CREATE TABLE IF NOT EXISTS checkins (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    trigger_kind TEXT NOT NULL,
    afternoon_state TEXT,
    event_type TEXT,
    intensity TEXT,
    back_pain_score INTEGER,
    categories_json TEXT NOT NULL,
    suggested_action_ids_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_checkins_user_id ON checkins(user_id);
CREATE INDEX IF NOT EXISTS idx_checkins_created_at ON checkins(created_at);

-- Micro-actions table
CREATE TABLE IF NOT EXISTS micro_actions (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    instructions TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL,
    duration_seconds INTEGER NOT NULL,
    context_tags_json TEXT NOT NULL DEFAULT '[]',
    condition_tags_json TEXT NOT NULL DEFAULT '[]',
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_micro_actions_category ON micro_actions(category);

-- Recovery protocols table
CREATE TABLE IF NOT EXISTS recovery_protocols (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    event_type TEXT NOT NULL,
    intensity TEXT NOT NULL,
    label TEXT NOT NULL,
    total_days INTEGER NOT NULL CHECK (total_days >= 1),
    days_completed INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'active',
    started_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_recovery_protocols_user_id ON recovery_protocols(user_id);

-- Subscriptions table (one per user)
CREATE TABLE IF NOT EXISTS subscriptions (
    user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    status TEXT NOT NULL DEFAULT 'none',
    plan TEXT NOT NULL DEFAULT 'free',
    current_period_end TEXT,
    updated_at TEXT NOT NULL
);

-- Weekly briefs table
CREATE TABLE IF NOT EXISTS weekly_briefs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    week_start TEXT NOT NULL,
    checkin_count INTEGER NOT NULL,
    top_categories_json TEXT NOT NULL,
    average_back_pain REAL,
    protocols_completed INTEGER NOT NULL,
    summary TEXT NOT NULL,
    created_at TEXT NOT NULL,
    read_at TEXT,
    UNIQUE(user_id, week_start)
);
"#;

/// Schema version table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
