//! Daily record aggregate.
//!
//! One [`DailyRecord`] per calendar date, keyed by `YYYY-MM-DD`. Sessions
//! and completed tasks are append-only; all earnings mutation goes through
//! record methods so the bucket/total invariant holds after every change.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

use super::earnings::{Category, Earnings};

/// A single study-timer session folded into a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whole minutes, floor of elapsed seconds / 60.
    pub duration: u64,
    /// Whether the session counted as completed under the earnings policy.
    pub completed: bool,
    /// Canonical 2-decimal-rounded amount.
    pub earnings: f64,
}

/// A task checked off during the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    pub id: Uuid,
    /// One of the five fixed category keys, or a user-defined custom
    /// category name.
    pub category: String,
    pub name: String,
    pub completed: bool,
    pub date: DateTime<Utc>,
    pub earnings: f64,
}

impl CompletedTask {
    pub fn new(category: &str, name: &str, earnings: f64, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.to_string(),
            name: name.to_string(),
            completed: true,
            date: at,
            earnings,
        }
    }
}

/// An early-wake / early-sleep check-in window, `HH:MM` bounds.
///
/// Bounds are compared as plain strings, so a window crossing midnight
/// (e.g. 23:30..00:30) is rejected by validation rather than silently
/// misbehaving. Known boundary gap, kept as-is pending product guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_time: String,
    pub end_time: String,
}

impl TimeWindow {
    pub fn new(start: &str, end: &str) -> Result<Self, ValidationError> {
        validate_hhmm(start)?;
        validate_hhmm(end)?;
        if start >= end {
            return Err(ValidationError::InvalidTimeWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self {
            start_time: start.to_string(),
            end_time: end.to_string(),
        })
    }

    /// Whether an `HH:MM` instant falls inside the window (inclusive).
    pub fn contains(&self, hhmm: &str) -> bool {
        self.start_time.as_str() <= hhmm && hhmm <= self.end_time.as_str()
    }
}

fn validate_hhmm(s: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidTimeOfDay(s.to_string()))
}

/// Aggregate of one calendar day's check-ins, sessions, and earnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Immutable identity key, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub wakeup_time: Option<DateTime<Utc>>,
    /// Legacy single sleep timestamp kept for old exports.
    #[serde(default)]
    pub sleep_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sleep_end_time: Option<DateTime<Utc>>,
    /// Minutes, derived from the sleep start/end pair.
    #[serde(default)]
    pub sleep_duration: i64,
    #[serde(default)]
    pub study_sessions: Vec<StudySession>,
    #[serde(default)]
    pub completed_tasks: Vec<CompletedTask>,
    #[serde(default)]
    pub total_earnings: Earnings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_wake_settings: Option<TimeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_sleep_settings: Option<TimeWindow>,
}

impl DailyRecord {
    /// Create an empty record for a date key.
    pub fn new(date: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
        Ok(Self {
            date: date.to_string(),
            wakeup_time: None,
            sleep_start_time: None,
            sleep_end_time: None,
            sleep_duration: 0,
            study_sessions: Vec::new(),
            completed_tasks: Vec::new(),
            total_earnings: Earnings::default(),
            early_wake_settings: None,
            early_sleep_settings: None,
        })
    }

    pub fn set_wakeup(&mut self, at: DateTime<Utc>) {
        self.wakeup_time = Some(at);
    }

    pub fn set_sleep_start(&mut self, at: DateTime<Utc>) {
        self.sleep_start_time = Some(at);
        self.derive_sleep_duration();
    }

    pub fn set_sleep_end(&mut self, at: DateTime<Utc>) {
        self.sleep_end_time = Some(at);
        self.derive_sleep_duration();
    }

    fn derive_sleep_duration(&mut self) {
        if let (Some(start), Some(end)) = (self.sleep_start_time, self.sleep_end_time) {
            self.sleep_duration = (end - start).num_minutes().max(0);
        }
    }

    pub fn set_early_wake(&mut self, window: TimeWindow) {
        self.early_wake_settings = Some(window);
    }

    pub fn set_early_sleep(&mut self, window: TimeWindow) {
        self.early_sleep_settings = Some(window);
    }

    /// Fold a completed timer session into the day. Session earnings are
    /// credited to the self-improvement bucket.
    pub fn record_session(&mut self, session: StudySession) {
        self.total_earnings
            .credit(Category::SelfImprovement, session.earnings);
        self.study_sessions.push(session);
    }

    /// Append a checked-off task, crediting its category bucket.
    pub fn record_task(&mut self, task: CompletedTask) -> Result<(), ValidationError> {
        if task.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name".to_string()));
        }
        if !task.earnings.is_finite() || task.earnings < 0.0 {
            return Err(ValidationError::InvalidAmount {
                field: "earnings".to_string(),
                message: format!("{} is not a non-negative amount", task.earnings),
            });
        }
        self.total_earnings
            .credit(Category::bucket_for(&task.category), task.earnings);
        self.completed_tasks.push(task);
        Ok(())
    }

    /// Total study minutes for the day.
    pub fn study_minutes(&self) -> u64 {
        self.study_sessions.iter().map(|s| s.duration).sum()
    }
}
