//! MicroReset - Wellness Check-in Engine
//!
//! A local-first engine for short daily wellness check-ins. Picks
//! condition-weighted micro-action categories, plans multi-day recovery
//! after logged events, gates premium features by subscription, and keeps
//! navigation state as an explicit value.

pub mod actions;
pub mod brief;
pub mod checkin;
pub mod navigation;
pub mod recovery;
pub mod scenario;
pub mod storage;
pub mod subscription;

// Re-export commonly used types
pub use actions::categories::{select_categories, Category, CategoryInput, ConditionTag};
pub use checkin::service::CheckinService;
pub use navigation::{AppAction, AppState, Screen};
pub use recovery::duration::{protocol_label, recovery_duration, Intensity};
pub use storage::config::UserProfile;
pub use storage::database::Database;
