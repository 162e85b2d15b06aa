//! Check-ins.
//!
//! Drafts collected by the check-in screens and their submission into
//! categories, suggested actions and recovery protocols.

pub mod service;
pub mod types;

pub use service::{CheckinError, CheckinOutcome, CheckinService};
pub use types::{AfternoonState, CheckIn, CheckinDraft, EventType, Trigger};
