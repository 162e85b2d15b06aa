//! Screen routing and UI state.
//!
//! Screens are an exhaustive enum with a compile-time checked route
//! mapping. UI state is an explicit value updated by pure transitions.

pub mod screens;
pub mod state;

pub use screens::Screen;
pub use state::{AppAction, AppState};
