//! Recovery-duration matrix and protocol labels.

use serde::{Deserialize, Serialize};

use crate::checkin::types::EventType;

/// Duration used for any event the matrix does not know.
pub const DEFAULT_RECOVERY_DAYS: u32 = 1;

/// Label used for any event the label table does not know.
pub const DEFAULT_PROTOCOL_LABEL: &str = "RECOVERY PROTOCOL";

/// How heavy a logged event was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    #[default]
    Moderate,
    Heavy,
}

impl Intensity {
    pub fn all() -> &'static [Intensity] {
        &[Intensity::Light, Intensity::Moderate, Intensity::Heavy]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Heavy => "heavy",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|i| i.as_str() == name.trim())
    }

    fn column(&self) -> usize {
        match self {
            Intensity::Light => 0,
            Intensity::Moderate => 1,
            Intensity::Heavy => 2,
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Days of recovery per event, indexed by intensity (light, moderate, heavy).
const RECOVERY_MATRIX: [(EventType, [u32; 3]); 4] = [
    (EventType::HeavyNight, [1, 2, 3]),
    (EventType::LongDesk, [1, 1, 2]),
    (EventType::PoorSleep, [1, 2, 2]),
    (EventType::Travel, [1, 2, 3]),
];

/// Number of recovery days for an event at a given intensity.
pub fn recovery_duration(event: EventType, intensity: Intensity) -> u32 {
    RECOVERY_MATRIX
        .iter()
        .find(|(e, _)| *e == event)
        .map(|(_, days)| days[intensity.column()])
        .unwrap_or(DEFAULT_RECOVERY_DAYS)
}

/// Display label for the recovery protocol started after an event.
pub fn protocol_label(event: EventType) -> &'static str {
    match event {
        EventType::HeavyNight => "HEAVY NIGHT RECOVERY",
        EventType::LongDesk => "DESK DAY RECOVERY",
        EventType::PoorSleep => "SLEEP DEBT RECOVERY",
        EventType::Travel => "TRAVEL RECOVERY",
        EventType::Other => DEFAULT_PROTOCOL_LABEL,
    }
}
