//! Saving and restoring a [`QuitSession`] through a [`KvStore`].
//!
//! Two keys are used:
//!
//! - `quit_instant`: epoch seconds as a decimal number (`1741521600.25`)
//! - `check_ins`: JSON array of epoch seconds, oldest first
//!
//! Nothing here returns an error. Store failures and malformed values become
//! [`PersistWarning`]s and loading falls back to "no saved session".

use chrono::{DateTime, Utc};

use super::KvStore;
use crate::error::PersistWarning;
use crate::session::QuitSession;

pub const QUIT_INSTANT_KEY: &str = "quit_instant";
pub const CHECK_INS_KEY: &str = "check_ins";

/// A loaded value plus whatever went wrong while loading it.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub warnings: Vec<PersistWarning>,
}

fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// Encode an instant as decimal epoch seconds.
pub fn encode_instant(at: DateTime<Utc>) -> String {
    epoch_seconds(at).to_string()
}

fn instant_from_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    DateTime::from_timestamp_micros((secs * 1_000_000.0).round() as i64)
}

/// Decode epoch seconds. Zero, negative and unparseable values give `None`.
pub fn decode_instant(raw: &str) -> Option<DateTime<Utc>> {
    raw.trim().parse::<f64>().ok().and_then(instant_from_seconds)
}

pub fn encode_check_ins(check_ins: &[DateTime<Utc>]) -> String {
    let secs: Vec<f64> = check_ins.iter().copied().map(epoch_seconds).collect();
    // A Vec<f64> of finite values always serializes.
    serde_json::to_string(&secs).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the stored check-in list.
///
/// Returns the valid instants in stored order and how many entries were
/// dropped as invalid. [`QuitSession::from_parts`] sorts them.
pub fn decode_check_ins(raw: &str) -> Result<(Vec<DateTime<Utc>>, usize), serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = values.len();
    let instants: Vec<DateTime<Utc>> = values
        .iter()
        .filter_map(serde_json::Value::as_f64)
        .filter_map(instant_from_seconds)
        .collect();
    let dropped = total - instants.len();
    Ok((instants, dropped))
}

/// Load the saved session, if there is one.
pub fn load_session<S: KvStore + ?Sized>(store: &S) -> Loaded<Option<QuitSession>> {
    let mut warnings = Vec::new();

    let quit_instant = match store.get(QUIT_INSTANT_KEY) {
        Ok(Some(raw)) => {
            let decoded = decode_instant(&raw);
            if decoded.is_none() && raw.trim().parse::<f64>().ok() != Some(0.0) {
                tracing::warn!("discarding invalid stored quit instant: {:?}", raw);
                warnings.push(PersistWarning::load(
                    QUIT_INSTANT_KEY,
                    format!("invalid timestamp {raw:?}"),
                ));
            }
            decoded
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("failed to read {}: {}", QUIT_INSTANT_KEY, e);
            warnings.push(PersistWarning::load(QUIT_INSTANT_KEY, e.to_string()));
            None
        }
    };

    let Some(quit_instant) = quit_instant else {
        return Loaded {
            value: None,
            warnings,
        };
    };

    let mut check_ins = match store.get(CHECK_INS_KEY) {
        Ok(Some(raw)) => match decode_check_ins(&raw) {
            Ok((instants, 0)) => instants,
            Ok((instants, dropped)) => {
                tracing::warn!("dropped {} invalid stored check-ins", dropped);
                warnings.push(PersistWarning::load(
                    CHECK_INS_KEY,
                    format!("dropped {dropped} invalid entries"),
                ));
                instants
            }
            Err(e) => {
                tracing::warn!("discarding malformed check-in list: {}", e);
                warnings.push(PersistWarning::load(CHECK_INS_KEY, e.to_string()));
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("failed to read {}: {}", CHECK_INS_KEY, e);
            warnings.push(PersistWarning::load(CHECK_INS_KEY, e.to_string()));
            Vec::new()
        }
    };

    if check_ins.windows(2).any(|pair| pair[0] > pair[1]) {
        tracing::warn!("stored check-ins were out of order; sorting");
        warnings.push(PersistWarning::load(CHECK_INS_KEY, "entries out of order"));
        check_ins.sort_unstable();
    }

    tracing::debug!(
        "loaded session: quit at {}, {} check-ins",
        quit_instant,
        check_ins.len()
    );
    Loaded {
        value: Some(QuitSession::from_parts(quit_instant, check_ins)),
        warnings,
    }
}

pub fn save_quit_instant<S: KvStore + ?Sized>(
    store: &mut S,
    at: DateTime<Utc>,
) -> Option<PersistWarning> {
    store
        .put(QUIT_INSTANT_KEY, &encode_instant(at))
        .err()
        .map(|e| {
            tracing::warn!("failed to save {}: {}", QUIT_INSTANT_KEY, e);
            PersistWarning::save(QUIT_INSTANT_KEY, e.to_string())
        })
}

pub fn save_check_ins<S: KvStore + ?Sized>(
    store: &mut S,
    check_ins: &[DateTime<Utc>],
) -> Option<PersistWarning> {
    store
        .put(CHECK_INS_KEY, &encode_check_ins(check_ins))
        .err()
        .map(|e| {
            tracing::warn!("failed to save {}: {}", CHECK_INS_KEY, e);
            PersistWarning::save(CHECK_INS_KEY, e.to_string())
        })
}

/// Write both keys. Returns one warning per key that failed.
pub fn save_session<S: KvStore + ?Sized>(
    store: &mut S,
    session: &QuitSession,
) -> Vec<PersistWarning> {
    [
        save_quit_instant(store, session.quit_instant()),
        save_check_ins(store, session.check_ins()),
    ]
    .into_iter()
    .flatten()
    .collect()
}
