//! Micro-action selection.
//!
//! Turns a check-in context into a short list of micro-actions:
//! - Condition-weighted category selection
//! - Ranking of stored actions against the selected categories
//! - The built-in action library

pub mod catalog;
pub mod categories;
pub mod ranking;
pub mod types;

// Re-exports for convenience
pub use catalog::builtin_actions;
pub use categories::{
    base_categories, candidate_categories, select_categories, Category, CategoryInput,
    CategorySelection, ConditionTag, MAX_CATEGORIES, MAX_RESULTS,
};
pub use ranking::{rank_actions, RankingContext};
pub use types::MicroAction;
