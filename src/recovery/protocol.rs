//! Multi-day recovery protocol lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::duration::{protocol_label, recovery_duration, Intensity};
use crate::checkin::types::EventType;

/// Status of a recovery protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolStatus {
    /// Days remain
    Active,
    /// All days done
    Completed,
}

impl ProtocolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolStatus::Active => "active",
            ProtocolStatus::Completed => "completed",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "active" => Some(ProtocolStatus::Active),
            "completed" => Some(ProtocolStatus::Completed),
            _ => None,
        }
    }
}

/// A multi-day sequence of suggested actions following a logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryProtocol {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Event that started the protocol
    pub event_type: EventType,
    /// Event intensity
    pub intensity: Intensity,
    /// Display label
    pub label: String,
    /// Length of the protocol in days (>= 1)
    pub total_days: u32,
    /// Days already done (0..=total_days)
    pub days_completed: u32,
    /// Current status
    pub status: ProtocolStatus,
    /// When the protocol started
    pub started_at: DateTime<Utc>,
    /// When the last day was completed
    pub completed_at: Option<DateTime<Utc>>,
}

impl RecoveryProtocol {
    /// Start a protocol sized by the recovery-duration matrix.
    pub fn start(
        user_id: Uuid,
        event_type: EventType,
        intensity: Intensity,
        now: DateTime<Utc>,
    ) -> Self {
        let total_days = recovery_duration(event_type, intensity).max(1);

        Self {
            id: Uuid::new_v4(),
            user_id,
            event_type,
            intensity,
            label: protocol_label(event_type).to_string(),
            total_days,
            days_completed: 0,
            status: ProtocolStatus::Active,
            started_at: now,
            completed_at: None,
        }
    }

    /// Mark one more day done. No-op once completed.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        if self.is_completed() {
            return;
        }

        self.days_completed += 1;
        if self.days_completed >= self.total_days {
            self.days_completed = self.total_days;
            self.status = ProtocolStatus::Completed;
            self.completed_at = Some(now);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProtocolStatus::Completed
    }

    /// The 1-based day currently being worked on, capped at `total_days`.
    pub fn current_day(&self) -> u32 {
        (self.days_completed + 1).min(self.total_days)
    }

    pub fn remaining_days(&self) -> u32 {
        self.total_days - self.days_completed
    }

    /// Progress as a percentage (0-100).
    pub fn progress_percent(&self) -> u8 {
        ((self.days_completed * 100) / self.total_days) as u8
    }

    /// e.g. "HEAVY NIGHT RECOVERY - Day 2 of 3".
    pub fn headline(&self) -> String {
        format!(
            "{} - Day {} of {}",
            self.label,
            self.current_day(),
            self.total_days
        )
    }
}
