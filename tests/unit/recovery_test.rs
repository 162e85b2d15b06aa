//! Unit tests for the recovery-duration matrix and protocol lifecycle.

use chrono::{Duration, Utc};
use microreset::checkin::types::EventType;
use microreset::recovery::duration::{
    protocol_label, recovery_duration, Intensity, DEFAULT_PROTOCOL_LABEL, DEFAULT_RECOVERY_DAYS,
};
use microreset::recovery::protocol::{ProtocolStatus, RecoveryProtocol};
use uuid::Uuid;

#[test]
fn test_matrix_values() {
    let expected = [
        (EventType::HeavyNight, [1, 2, 3]),
        (EventType::LongDesk, [1, 1, 2]),
        (EventType::PoorSleep, [1, 2, 2]),
        (EventType::Travel, [1, 2, 3]),
    ];

    for (event, days) in expected {
        assert_eq!(recovery_duration(event, Intensity::Light), days[0]);
        assert_eq!(recovery_duration(event, Intensity::Moderate), days[1]);
        assert_eq!(recovery_duration(event, Intensity::Heavy), days[2]);
    }
}

#[test]
fn test_unknown_event_recovers_in_one_day() {
    let unknown = EventType::from_name("wedding");
    assert_eq!(unknown, EventType::Other);
    for intensity in Intensity::all() {
        assert_eq!(recovery_duration(unknown, *intensity), DEFAULT_RECOVERY_DAYS);
    }
    assert_eq!(protocol_label(unknown), DEFAULT_PROTOCOL_LABEL);
}

#[test]
fn test_duration_is_at_least_one_and_monotonic() {
    for event in EventType::all() {
        let light = recovery_duration(*event, Intensity::Light);
        let moderate = recovery_duration(*event, Intensity::Moderate);
        let heavy = recovery_duration(*event, Intensity::Heavy);
        assert!(light >= 1);
        assert!(light <= moderate && moderate <= heavy);
    }
}

#[test]
fn test_labels() {
    assert_eq!(protocol_label(EventType::HeavyNight), "HEAVY NIGHT RECOVERY");
    assert_eq!(protocol_label(EventType::LongDesk), "DESK DAY RECOVERY");
    assert_eq!(protocol_label(EventType::PoorSleep), "SLEEP DEBT RECOVERY");
    assert_eq!(protocol_label(EventType::Travel), "TRAVEL RECOVERY");
}

#[test]
fn test_protocol_runs_to_completion() {
    let start = Utc::now();
    let mut protocol =
        RecoveryProtocol::start(Uuid::new_v4(), EventType::Travel, Intensity::Heavy, start);

    assert_eq!(protocol.total_days, 3);
    assert_eq!(protocol.status, ProtocolStatus::Active);
    assert_eq!(protocol.headline(), "TRAVEL RECOVERY - Day 1 of 3");

    protocol.advance(start + Duration::days(1));
    protocol.advance(start + Duration::days(2));
    assert_eq!(protocol.headline(), "TRAVEL RECOVERY - Day 3 of 3");
    assert!(!protocol.is_completed());

    protocol.advance(start + Duration::days(3));
    assert!(protocol.is_completed());
    assert_eq!(protocol.progress_percent(), 100);
    assert_eq!(protocol.remaining_days(), 0);

    // Further advances change nothing
    let finished = protocol.clone();
    protocol.advance(start + Duration::days(4));
    assert_eq!(protocol, finished);
}
