//! Weekly brief composition.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::categories::Category;
use crate::checkin::types::CheckIn;
use crate::recovery::protocol::RecoveryProtocol;

/// Number of categories listed in a brief.
const TOP_CATEGORY_COUNT: usize = 3;

/// Summary of one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBrief {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Monday of the summarized week
    pub week_start: NaiveDate,
    /// Check-ins submitted during the week
    pub checkin_count: u32,
    /// Most frequent categories, most frequent first
    pub top_categories: Vec<Category>,
    /// Mean of reported back-pain scores
    pub average_back_pain: Option<f32>,
    /// Recovery protocols finished during the week
    pub protocols_completed: u32,
    /// One-line summary for display
    pub summary: String,
    /// When the brief was composed
    pub created_at: DateTime<Utc>,
    /// First time the user opened it
    pub read_at: Option<DateTime<Utc>>,
}

impl WeeklyBrief {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// Monday of the week containing `date`.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// UTC bounds `[start, end)` of the week beginning at `week_start`.
pub fn week_bounds(week_start: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = week_start.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(7))
}

/// Build the brief for a week from the user's records.
///
/// Records outside the week are ignored, so callers may pass wider sets.
pub fn compose_weekly_brief(
    user_id: Uuid,
    week_start: NaiveDate,
    checkins: &[CheckIn],
    protocols: &[RecoveryProtocol],
    now: DateTime<Utc>,
) -> WeeklyBrief {
    let (start, end) = week_bounds(week_start);
    let in_week = |t: &DateTime<Utc>| *t >= start && *t < end;

    let week_checkins: Vec<&CheckIn> = checkins
        .iter()
        .filter(|c| c.user_id == user_id && in_week(&c.created_at))
        .collect();

    let top_categories = top_categories(&week_checkins);

    let scores: Vec<u8> = week_checkins
        .iter()
        .filter_map(|c| c.back_pain_score)
        .collect();
    let average_back_pain = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().map(|s| *s as f32).sum::<f32>() / scores.len() as f32)
    };

    let protocols_completed = protocols
        .iter()
        .filter(|p| p.user_id == user_id)
        .filter(|p| p.completed_at.as_ref().map(in_week).unwrap_or(false))
        .count() as u32;

    let checkin_count = week_checkins.len() as u32;
    let summary = summarize(checkin_count, &top_categories, protocols_completed);

    WeeklyBrief {
        id: Uuid::new_v4(),
        user_id,
        week_start,
        checkin_count,
        top_categories,
        average_back_pain,
        protocols_completed,
        summary,
        created_at: now,
        read_at: None,
    }
}

/// Most frequent categories; ties keep first-seen order.
fn top_categories(checkins: &[&CheckIn]) -> Vec<Category> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for category in checkins.iter().flat_map(|c| c.categories.iter()) {
        match counts.iter_mut().find(|(c, _)| c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((*category, 1)),
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_CATEGORY_COUNT)
        .map(|(c, _)| c)
        .collect()
}

fn summarize(checkin_count: u32, top: &[Category], protocols_completed: u32) -> String {
    if checkin_count == 0 {
        return "No check-ins this week. A two-minute reset is a good place to start.".to_string();
    }

    let mut summary = format!(
        "{} check-in{} this week.",
        checkin_count,
        if checkin_count == 1 { "" } else { "s" }
    );

    if !top.is_empty() {
        let labels: Vec<&str> = top.iter().map(|c| c.label()).collect();
        summary.push_str(&format!(" Focus: {}.", labels.join(", ")));
    }

    if protocols_completed > 0 {
        summary.push_str(&format!(
            " {} recovery protocol{} completed.",
            protocols_completed,
            if protocols_completed == 1 { "" } else { "s" }
        ));
    }

    summary
}
