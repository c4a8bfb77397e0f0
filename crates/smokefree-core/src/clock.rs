//! Clock collaborator and local-calendar helpers.
//!
//! The tracker never calls `Utc::now()` directly. It asks a [`Clock`], and the
//! time zone of the returned instant is the calendar used for "same day"
//! and "elapsed days" decisions.

use std::cell::RefCell;

use chrono::{DateTime, Days, Duration, Local, NaiveDate, TimeZone, Utc};

/// Source of the current instant.
pub trait Clock {
    /// Calendar the clock reports in.
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Wall clock in the process's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    type Tz = C::Tz;

    fn now(&self) -> DateTime<C::Tz> {
        (**self).now()
    }
}

/// Clock that only moves when told to.
///
/// Uses interior mutability so a test can keep advancing it while a tracker
/// holds a shared reference.
#[derive(Debug)]
pub struct ManualClock<Tz: TimeZone> {
    now: RefCell<DateTime<Tz>>,
}

impl<Tz: TimeZone> ManualClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            now: RefCell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Tz>) {
        *self.now.borrow_mut() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.borrow_mut();
        *now = now.clone() + by;
    }
}

impl<Tz: TimeZone> Clock for ManualClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.now.borrow().clone()
    }
}

/// Calendar day of `instant` as seen from `tz`.
pub fn local_day<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Day component of the calendar difference `from -> to`.
///
/// Counts whole local days: a day only counts once the wall-clock time of
/// `to` has reached the wall-clock time of `from`. Truncates toward zero.
pub fn calendar_days_between<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> i64 {
    let from = from.naive_local();
    let to = to.naive_local();
    let mut days = (to.date() - from.date()).num_days();
    if days > 0 && to.time() < from.time() {
        days -= 1;
    } else if days < 0 && to.time() > from.time() {
        days += 1;
    }
    days
}

/// Same local time of day on the following calendar day.
///
/// Falls back to a plain 24h shift when that wall-clock time does not exist
/// (DST gap).
pub fn same_time_next_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = instant.timezone();
    instant
        .naive_local()
        .checked_add_days(Days::new(1))
        .and_then(|next| tz.from_local_datetime(&next).earliest())
        .unwrap_or_else(|| instant.clone() + Duration::hours(24))
}
