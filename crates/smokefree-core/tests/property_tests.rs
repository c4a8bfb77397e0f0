//! Property-based tests for the quit session and its persistence.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated timelines.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;
use smokefree_core::storage::{load_session, save_session};
use smokefree_core::{MemoryStore, QuitSession};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

prop_compose! {
    fn arbitrary_instant()(secs in 0i64..5 * 365 * 86_400, micros in 0i64..1_000_000) -> DateTime<Utc> {
        base() + Duration::seconds(secs) + Duration::microseconds(micros)
    }
}

prop_compose! {
    fn arbitrary_zone()(hours in -11i32..=12) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }
}

/// Session built by attempting a check-in at each of the given gaps.
fn simulate(quit: DateTime<Utc>, gaps_min: &[i64]) -> (QuitSession, DateTime<Utc>) {
    let mut session = QuitSession::new(quit);
    let mut now = quit;
    for gap in gaps_min {
        now += Duration::minutes(*gap);
        session.record_check_in(&now);
    }
    (session, now)
}

proptest! {
    #[test]
    fn quit_instant_is_day_zero(quit in arbitrary_instant(), tz in arbitrary_zone()) {
        let session = QuitSession::new(quit);
        prop_assert_eq!(session.elapsed_days(&quit.with_timezone(&tz)), 0);
    }

    #[test]
    fn elapsed_days_matches_whole_days_in_utc(quit in arbitrary_instant(), secs in 0i64..3 * 365 * 86_400) {
        let session = QuitSession::new(quit);
        let now = quit + Duration::seconds(secs);
        prop_assert_eq!(i64::from(session.elapsed_days(&now)), secs / 86_400);
    }

    #[test]
    fn elapsed_duration_components_are_bounded(quit in arbitrary_instant(), secs in 0i64..400 * 86_400) {
        let session = QuitSession::new(quit);
        let d = session.elapsed_duration(&(quit + Duration::seconds(secs)));
        prop_assert!(d.minutes < 60);
        prop_assert!(d.seconds < 60);
        prop_assert_eq!((d.hours * 3600 + d.minutes * 60 + d.seconds) as i64, secs);
    }

    #[test]
    fn checked_in_today_excludes_eligibility(
        quit in arbitrary_instant(),
        gaps in prop::collection::vec(60i64..3 * 24 * 60, 0..20),
        probe in 0i64..3 * 24 * 60,
        tz in arbitrary_zone(),
    ) {
        let (session, last) = simulate(quit, &gaps);
        let now = (last + Duration::minutes(probe)).with_timezone(&tz);
        if session.has_checked_in_today(&now) {
            prop_assert!(!session.can_check_in(&now));
        }
    }

    #[test]
    fn same_day_check_ins_add_at_most_one(
        quit in arbitrary_instant(),
        gaps in prop::collection::vec(60i64..3 * 24 * 60, 0..10),
        first in 0i64..3 * 24 * 60,
        second in 0i64..24 * 60,
    ) {
        let (mut session, last) = simulate(quit, &gaps);
        let before = session.streak_count();
        let t1 = last + Duration::minutes(first);
        session.record_check_in(&t1);

        let t2 = t1 + Duration::minutes(second);
        if t2.date_naive() == t1.date_naive() {
            session.record_check_in(&t2);
        }
        prop_assert!(session.streak_count() <= before + 1);
    }

    #[test]
    fn recorded_check_ins_are_spaced_and_on_distinct_days(
        quit in arbitrary_instant(),
        gaps in prop::collection::vec(30i64..2 * 24 * 60, 1..40),
        tz in arbitrary_zone(),
    ) {
        let mut session = QuitSession::new(quit);
        let mut now = quit.with_timezone(&tz);
        for gap in &gaps {
            now += Duration::minutes(*gap);
            session.record_check_in(&now);
        }

        let check_ins = session.check_ins();
        prop_assert!(check_ins.first().map_or(true, |first| *first - quit >= Duration::hours(24)));
        for pair in check_ins.windows(2) {
            prop_assert!(pair[1] - pair[0] >= Duration::hours(24));
            prop_assert_ne!(
                pair[0].with_timezone(&tz).date_naive(),
                pair[1].with_timezone(&tz).date_naive()
            );
        }
    }

    #[test]
    fn next_eligible_is_absent_exactly_when_eligible(
        quit in arbitrary_instant(),
        gaps in prop::collection::vec(60i64..3 * 24 * 60, 0..10),
        probe in 0i64..3 * 24 * 60,
    ) {
        let (session, last) = simulate(quit, &gaps);
        let now = last + Duration::minutes(probe);
        match session.next_eligible_instant(&now) {
            None => prop_assert!(session.can_check_in(&now)),
            Some(next) => {
                prop_assert!(!session.can_check_in(&now));
                prop_assert!(next > now);
            }
        }
    }

    #[test]
    fn save_then_load_round_trips(
        quit in arbitrary_instant(),
        gaps in prop::collection::vec(60i64..3 * 24 * 60, 0..15),
    ) {
        let (session, _) = simulate(quit, &gaps);
        let mut store = MemoryStore::new();
        prop_assert!(save_session(&mut store, &session).is_empty());

        let loaded = load_session(&store);
        prop_assert!(loaded.warnings.is_empty());
        let restored = loaded.value.unwrap();

        let drift = (restored.quit_instant() - session.quit_instant()).num_milliseconds().abs();
        prop_assert!(drift < 100);
        prop_assert_eq!(restored.check_ins().len(), session.check_ins().len());
        for (a, b) in restored.check_ins().iter().zip(session.check_ins()) {
            prop_assert!((*a - *b).num_milliseconds().abs() < 100);
        }
    }

    #[test]
    fn restart_always_clears(
        quit in arbitrary_instant(),
        gaps in prop::collection::vec(60i64..3 * 24 * 60, 0..15),
        new_quit in arbitrary_instant(),
    ) {
        let (mut session, _) = simulate(quit, &gaps);
        session.restart(new_quit);
        prop_assert!(session.check_ins().is_empty());
        prop_assert_eq!(session.quit_instant(), new_quit);
    }
}
