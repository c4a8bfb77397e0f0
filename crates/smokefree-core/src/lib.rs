//! # SmokeFree Core Library
//!
//! This library provides the quit-tracking logic behind SmokeFree. All
//! operations are available through the standalone CLI, which is a thin
//! presentation layer over the same core.
//!
//! ## Architecture
//!
//! - **Session**: the quit instant plus ordered check-ins, with pure derived
//!   queries evaluated against a caller-supplied "now"
//! - **Tracker**: owns the session together with an injected clock and
//!   key-value store; performs check-in, setup and reset
//! - **Storage**: SQLite key-value store and TOML-based configuration
//! - **Milestones / health**: fixed progress ladders derived from elapsed days
//!
//! ## Key Components
//!
//! - [`QuitTracker`]: check-in state machine
//! - [`QuitSession`]: persisted state and derivations
//! - [`Database`]: SQLite-backed [`KvStore`]
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod health;
pub mod milestone;
pub mod session;
pub mod storage;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, PersistOp, PersistWarning, StoreError};
pub use events::Event;
pub use health::HealthBenefit;
pub use milestone::{MilestoneProgress, MilestoneTarget, MILESTONE_DAYS};
pub use session::{ElapsedDuration, QuitSession, ELIGIBILITY_WINDOW_HOURS};
pub use storage::{Config, Database, KvStore, Loaded, MemoryStore};
pub use tracker::{Outcome, QuitTracker, TrackerSnapshot};
