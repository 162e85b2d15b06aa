//! Recovery protocols after logged events.
//!
//! Covers:
//! - The event x intensity duration matrix and protocol labels
//! - The day-by-day protocol lifecycle

pub mod duration;
pub mod protocol;

pub use duration::{protocol_label, recovery_duration, Intensity};
pub use protocol::{ProtocolStatus, RecoveryProtocol};
