pub mod check_in;
pub mod config;
pub mod reset;
pub mod setup;
pub mod status;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use smokefree_core::storage::Database;
use smokefree_core::{Clock, Config, PersistWarning, QuitTracker, SystemClock};

pub type Tracker = QuitTracker<Database, SystemClock>;

/// Open the configured database and restore the tracker from it.
pub fn open_tracker(config: &Config) -> Result<Tracker, Box<dyn std::error::Error>> {
    tracing::debug!("opening store {}", config.storage.database_file);
    let db = Database::open_in_data_dir(&config.storage.database_file)?;
    let loaded = QuitTracker::open(db, SystemClock);
    report_warnings(&loaded.warnings);
    Ok(loaded.value)
}

/// Like [`open_tracker`] but fails when no quit date has been set up yet.
pub fn open_configured_tracker(config: &Config) -> Result<Tracker, Box<dyn std::error::Error>> {
    let tracker = open_tracker(config)?;
    if !tracker.is_configured() {
        return Err("no quit date set; run `smokefree setup <when>` first".into());
    }
    Ok(tracker)
}

pub fn report_warnings(warnings: &[PersistWarning]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}

/// Parse a user-supplied quit instant and reject anything in the future.
///
/// Accepts `now`, RFC 3339, or local `YYYY-MM-DD HH:MM[:SS]` / `YYYY-MM-DD`.
pub fn parse_quit_instant(raw: &str, clock: &impl Clock) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let now = clock.now().with_timezone(&Utc);
    let raw = raw.trim();

    let parsed = if raw.eq_ignore_ascii_case("now") {
        now
    } else if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else {
        let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| format!("cannot parse '{raw}' as a date/time"))?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| format!("'{raw}' does not exist in the local time zone"))?
            .with_timezone(&Utc)
    };

    if parsed > now {
        return Err(format!("quit date '{raw}' is in the future").into());
    }
    Ok(parsed)
}
