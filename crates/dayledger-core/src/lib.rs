//! # Dayledger Core Library
//!
//! Core business logic for Dayledger, a daily habit and earnings ledger.
//! The CLI binary is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Vault**: tiered storage behind a uniform save/read/list/delete/
//!   rename contract. The best available backend is selected once at open
//!   time (durable directory, then key-value store), with a manual
//!   download hand-off as the save-time fallback.
//! - **Study timer**: a wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()`, with stopwatch and countdown
//!   modes and an outcome-dependent earnings policy.
//! - **Records**: one `DailyRecord` aggregate per calendar day (check-ins,
//!   sessions, completed tasks, per-category earnings).
//! - **Export**: the JSON bundle and the BOM-prefixed CSV consumed by
//!   external tooling.
//!
//! ## Key components
//!
//! - [`Vault`]: tier selection and the storage contract
//! - [`StudyTimer`]: timer state machine and earnings policy
//! - [`DailyRecord`] / [`RecordStore`]: the daily aggregate and its
//!   persistence
//! - [`Settings`]: application configuration

pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod record;
pub mod timer;
pub mod vault;

pub use config::{data_dir, Settings};
pub use error::{ConfigError, CoreError, Result, ValidationError, VaultError};
pub use events::Event;
pub use export::ExportBundle;
pub use record::{
    Category, CompletedTask, DailyRecord, Earnings, RecordStore, StudySession, TaskCatalog,
    TimeWindow,
};
pub use timer::{StudyTimer, TimerMode, TimerState};
pub use vault::{SaveOutcome, StorageTier, Vault, VaultBlob, VaultEntry, VaultOptions};
