//! Integration tests for the quit tracker.
//!
//! Drives the tracker through a manual clock against the SQLite store,
//! including reopening the database to check what was persisted.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use smokefree_core::storage::persist::{CHECK_INS_KEY, QUIT_INSTANT_KEY};
use smokefree_core::{
    Database, ElapsedDuration, Event, HealthBenefit, KvStore, ManualClock, MemoryStore,
    MilestoneTarget, QuitSession, QuitTracker, StoreError,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap()
}

fn tracker_at<'c>(
    clock: &'c ManualClock<Utc>,
    session: QuitSession,
) -> QuitTracker<Database, &'c ManualClock<Utc>> {
    QuitTracker::with_session(Database::open_memory().unwrap(), clock, session)
}

#[test]
fn two_hours_after_quitting() {
    let clock = ManualClock::new(now());
    let tracker = tracker_at(&clock, QuitSession::new(now() - Duration::hours(2)));

    assert_eq!(tracker.elapsed_days(), 0);
    assert!(!tracker.can_check_in());
    assert_eq!(
        tracker.elapsed_duration(),
        ElapsedDuration { hours: 2, minutes: 0, seconds: 0 }
    );
    assert!(tracker.unlocked_health_benefits().is_empty());
    assert_eq!(tracker.next_health_benefit(), Some(HealthBenefit::Circulation));
}

#[test]
fn first_check_in_after_twenty_five_hours() {
    let clock = ManualClock::new(now());
    let mut tracker = tracker_at(&clock, QuitSession::new(now() - Duration::hours(25)));

    assert!(tracker.can_check_in());
    let outcome = tracker.check_in();
    assert!(outcome.is_durable());
    assert_eq!(tracker.check_ins().len(), 1);
    assert!(tracker.has_checked_in_today());
    assert!(!tracker.can_check_in());
}

#[test]
fn eight_days_in() {
    let clock = ManualClock::new(now());
    let tracker = tracker_at(&clock, QuitSession::new(now() - Duration::days(8)));

    assert_eq!(tracker.elapsed_days(), 8);
    let progress = tracker.progress_to_milestone();
    assert_eq!(progress.target, MilestoneTarget::Days(30));
    assert!((progress.progress - 8.0 / 30.0).abs() < 1e-12);
}

#[test]
fn four_hundred_days_in() {
    let clock = ManualClock::new(now());
    let tracker = tracker_at(&clock, QuitSession::new(now() - Duration::days(400)));

    assert_eq!(tracker.elapsed_days(), 400);
    assert_eq!(tracker.progress_to_milestone().target, MilestoneTarget::Years(2));
    assert_eq!(tracker.unlocked_health_benefits().len(), 4);
}

#[test]
fn eligible_thirty_hours_after_last_check_in() {
    let clock = ManualClock::new(now());
    let session =
        QuitSession::from_parts(now() - Duration::hours(50), vec![now() - Duration::hours(30)]);
    let tracker = tracker_at(&clock, session);

    assert!(tracker.can_check_in());
    assert!(!tracker.has_checked_in_today());
    assert_eq!(tracker.next_eligible_instant(), None);
}

#[test]
fn daily_ritual_over_a_week() {
    let tz = FixedOffset::east_opt(8 * 3600).unwrap();
    let quit = tz.with_ymd_and_hms(2025, 3, 1, 21, 0, 0).unwrap();
    let clock = ManualClock::new(quit);
    let mut tracker = QuitTracker::open(MemoryStore::new(), &clock).value;
    tracker.set_initial_quit_date(quit.with_timezone(&Utc));

    // Morning and evening attempts every day for a week.
    for _ in 0..7 {
        clock.advance(Duration::hours(12));
        tracker.check_in();
        clock.advance(Duration::hours(12));
        tracker.check_in();
    }

    // Day one is blocked by the first 24h; afterwards only the 21:00 slot
    // is ever 24h past the previous check-in.
    assert_eq!(tracker.streak_count(), 7);
    assert_eq!(tracker.elapsed_days(), 7);
    for pair in tracker.check_ins().windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::hours(24));
    }
}

#[test]
fn state_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smokefree.db");
    let clock = ManualClock::new(now());

    {
        let db = Database::open(&path).unwrap();
        let loaded = QuitTracker::open(db, &clock);
        assert!(loaded.warnings.is_empty());
        let mut tracker = loaded.value;
        assert!(!tracker.is_configured());

        tracker.set_initial_quit_date(now() - Duration::days(3));
        assert!(matches!(tracker.check_in().event, Event::CheckedIn { .. }));
    }

    clock.advance(Duration::days(1));
    let db = Database::open(&path).unwrap();
    let mut tracker = QuitTracker::open(db, &clock).value;
    assert!(tracker.is_configured());
    assert_eq!(tracker.quit_instant(), now() - Duration::days(3));
    assert_eq!(tracker.check_ins(), &[now()]);
    assert!(tracker.can_check_in());

    let outcome = tracker.reset(now());
    assert_eq!(
        outcome.event,
        Event::SessionReset {
            quit_instant: now(),
            cleared_check_ins: 1,
            at: now() + Duration::days(1),
        }
    );

    let db = Database::open(&path).unwrap();
    assert_eq!(db.get(CHECK_INS_KEY).unwrap().as_deref(), Some("[]"));
    let tracker = QuitTracker::open(db, &clock).value;
    assert!(tracker.check_ins().is_empty());
    assert_eq!(tracker.quit_instant(), now());
}

#[test]
fn corrupt_quit_instant_loads_as_no_session() {
    let clock = ManualClock::new(now());
    let mut db = Database::open_memory().unwrap();
    db.put(QUIT_INSTANT_KEY, "-12").unwrap();
    db.put(CHECK_INS_KEY, "[1741521600]").unwrap();

    let loaded = QuitTracker::open(db, &clock);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(!loaded.value.is_configured());
    assert!(loaded.value.check_ins().is_empty());
}

#[test]
fn setup_after_corrupt_quit_instant_discards_old_check_ins() {
    let clock = ManualClock::new(now());
    let mut db = Database::open_memory().unwrap();
    db.put(QUIT_INSTANT_KEY, "garbage").unwrap();
    db.put(CHECK_INS_KEY, "[1741500000, 1741000000]").unwrap();

    let mut tracker = QuitTracker::open(db, &clock).value;
    let outcome = tracker.set_initial_quit_date(now() - Duration::hours(2));
    assert!(outcome.is_durable());

    let db = tracker.into_store();
    assert_eq!(db.get(CHECK_INS_KEY).unwrap().as_deref(), Some("[]"));
    let reopened = QuitTracker::open(db, &clock);
    assert!(reopened.warnings.is_empty());
    assert!(reopened.value.check_ins().is_empty());
    assert!(!reopened.value.has_checked_in_today());
}

/// Store whose every call fails.
struct OfflineStore;

impl KvStore for OfflineStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }

    fn put(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }
}

#[test]
fn offline_store_never_blocks_mutations() {
    let clock = ManualClock::new(now());
    let loaded = QuitTracker::open(OfflineStore, &clock);
    assert_eq!(loaded.warnings.len(), 1);

    let mut tracker = loaded.value;
    let outcome = tracker.set_initial_quit_date(now() - Duration::days(2));
    assert_eq!(outcome.warnings.len(), 2);
    assert_eq!(tracker.elapsed_days(), 2);

    let outcome = tracker.check_in();
    assert!(matches!(outcome.event, Event::CheckedIn { total_check_ins: 1, .. }));
    assert!(!outcome.is_durable());
    assert_eq!(tracker.streak_count(), 1);
}
