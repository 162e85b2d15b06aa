//! Integration tests for weekly briefs built from real check-ins.

use chrono::{Duration, Utc};
use microreset::brief::compose::{week_bounds, week_start_for};
use microreset::brief::service::{BriefError, BriefService};
use microreset::checkin::service::CheckinService;
use microreset::checkin::types::{AfternoonState, CheckinDraft, EventType, Trigger};
use microreset::recovery::duration::Intensity;
use microreset::storage::brief_store::BriefStore;
use microreset::storage::config::{AppConfig, CheckinSettings, UserProfile};
use microreset::storage::database::Database;
use microreset::subscription::gating::{FreeTier, GateReason};

#[test]
fn test_brief_reflects_the_week() {
    let db = Database::open_in_memory().unwrap();
    let user = UserProfile::new("Weekly".to_string());
    db.insert_user(&user).unwrap();

    let week = week_start_for(Utc::now().date_naive());
    let (monday, _) = week_bounds(week);
    let checkins = CheckinService::new(&db, CheckinSettings::default(), FreeTier::default());

    let mut stressed = CheckinDraft::for_trigger(Trigger::Midday);
    stressed.afternoon_state = Some(AfternoonState::Stressed);
    stressed.back_pain_score = Some(2);
    checkins
        .submit(&user.id, &stressed, monday + Duration::hours(12))
        .unwrap();
    checkins
        .submit(&user.id, &stressed, monday + Duration::hours(36))
        .unwrap();

    let mut travel = CheckinDraft::for_trigger(Trigger::PostEvent);
    travel.event_type = Some(EventType::LongDesk);
    travel.intensity = Some(Intensity::Light);
    travel.back_pain_score = Some(5);
    checkins
        .submit(&user.id, &travel, monday + Duration::hours(40))
        .unwrap();

    // Last week's check-in is not counted
    checkins
        .submit(&user.id, &stressed, monday - Duration::hours(1))
        .unwrap();

    let brief = BriefService::new(&db, FreeTier::default())
        .read(&user.id, week, monday + Duration::days(6))
        .unwrap();

    assert_eq!(brief.week_start, week);
    assert_eq!(brief.checkin_count, 3);
    assert_eq!(brief.average_back_pain, Some(3.0));
    assert!(brief.summary.starts_with("3 check-ins this week."));
    assert!(brief.is_read());

    let stored = BriefStore::new(db.connection())
        .get(&user.id, week)
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, brief.id);
    assert!(stored.is_read());
}

#[test]
fn test_brief_allowance_from_config() {
    let db = Database::open_in_memory().unwrap();
    let user = UserProfile::new("Budget".to_string());
    db.insert_user(&user).unwrap();

    let mut config = AppConfig::default();
    config.free_tier.brief_reads = 2;
    let service = BriefService::new(&db, config.free_tier);
    let now = Utc::now();
    let this_week = now.date_naive();

    service.read(&user.id, this_week, now).unwrap();
    service
        .read(&user.id, this_week - Duration::days(7), now)
        .unwrap();
    let err = service
        .read(&user.id, this_week - Duration::days(14), now)
        .unwrap_err();
    assert!(matches!(err, BriefError::Gated(GateReason::FreeLimit)));
}
