//! Weekly brief.
//!
//! A short weekly summary of check-ins and recovery, composed from stored
//! records and read through the free-tier gate.

pub mod compose;
pub mod service;

pub use compose::{compose_weekly_brief, week_start_for, WeeklyBrief};
pub use service::{BriefError, BriefService};
