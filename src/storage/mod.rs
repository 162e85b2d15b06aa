//! Storage module for database and configuration.

pub mod action_store;
pub mod brief_store;
pub mod config;
pub mod database;
pub mod recovery_store;
pub mod schema;
pub mod subscription_store;

pub use action_store::ActionStore;
pub use brief_store::BriefStore;
pub use config::{AppConfig, CheckinSettings, ConfigError, UserProfile};
pub use database::{Database, DatabaseError};
pub use recovery_store::RecoveryStore;
pub use subscription_store::SubscriptionStore;
