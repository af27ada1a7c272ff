//! Export formats consumed by external tooling.
//!
//! JSON bundles the full persisted state; CSV is one row per daily record
//! with a fixed column order and a leading byte-order mark so spreadsheet
//! tools pick up the UTF-8 encoding.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Settings;
use crate::record::{DailyRecord, TaskCatalog};

/// The JSON export shape:
/// `{dailyData, tasks, customCategories, settings}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub daily_data: Vec<DailyRecord>,
    pub tasks: BTreeMap<String, Vec<String>>,
    pub custom_categories: Vec<String>,
    pub settings: Settings,
}

impl ExportBundle {
    pub fn new(daily_data: Vec<DailyRecord>, catalog: TaskCatalog, settings: Settings) -> Self {
        Self {
            daily_data,
            tasks: catalog.tasks,
            custom_categories: catalog.custom_categories,
            settings,
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

const CSV_HEADER: &str = "Date,Wake Time,Sleep Start (legacy),Sleep Minutes,Sleep Duration,\
Sleep Start,Sleep End,Study Minutes,Completed Tasks,Body Health,Mental Health,\
Soul Nourishment,Self Improvement,Social Bonds,Total";

/// One row per daily record, fixed column order, UTF-8 with a leading BOM.
pub fn to_csv(records: &[DailyRecord]) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str(CSV_HEADER);
    out.push('\n');
    for rec in records {
        let e = &rec.total_earnings;
        let row = [
            rec.date.clone(),
            fmt_time(rec.wakeup_time),
            fmt_time(rec.sleep_start_time),
            rec.sleep_duration.to_string(),
            fmt_sleep_duration(rec.sleep_duration),
            fmt_time(rec.sleep_start_time),
            fmt_time(rec.sleep_end_time),
            rec.study_minutes().to_string(),
            rec.completed_tasks.len().to_string(),
            format!("{:.2}", e.body_health),
            format!("{:.2}", e.mental_health),
            format!("{:.2}", e.soul_nourishment),
            format!("{:.2}", e.self_improvement),
            format!("{:.2}", e.social_bonds),
            format!("{:.2}", e.total),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn fmt_time(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
}

fn fmt_sleep_duration(minutes: i64) -> String {
    if minutes <= 0 {
        return String::new();
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CompletedTask;
    use chrono::{TimeZone, Utc};

    fn sample_record() -> DailyRecord {
        let mut rec = DailyRecord::new("2026-03-14").unwrap();
        rec.set_wakeup(Utc.with_ymd_and_hms(2026, 3, 14, 6, 30, 0).unwrap());
        rec.set_sleep_start(Utc.with_ymd_and_hms(2026, 3, 13, 23, 0, 0).unwrap());
        rec.set_sleep_end(Utc.with_ymd_and_hms(2026, 3, 14, 6, 30, 0).unwrap());
        rec.record_task(CompletedTask::new(
            "bodyHealth",
            "Morning run",
            5.0,
            Utc.with_ymd_and_hms(2026, 3, 14, 7, 0, 0).unwrap(),
        ))
        .unwrap();
        rec
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let csv = to_csv(&[sample_record()]);
        assert!(csv.starts_with('\u{feff}'));
        let mut lines = csv.trim_start_matches('\u{feff}').lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        let row = lines.next().unwrap();
        let cols: Vec<&str> = row.split(',').collect();
        assert_eq!(cols.len(), 15);
        assert_eq!(cols[0], "2026-03-14");
        assert_eq!(cols[1], "06:30");
        assert_eq!(cols[3], "450");
        assert_eq!(cols[4], "7h 30m");
        assert_eq!(cols[8], "1");
        assert_eq!(cols[9], "5.00");
        assert_eq!(cols[14], "5.00");
    }

    #[test]
    fn json_bundle_uses_export_keys() {
        let bundle = ExportBundle::new(
            vec![sample_record()],
            TaskCatalog::with_defaults(),
            Settings::default(),
        );
        let value: serde_json::Value = serde_json::from_str(&bundle.to_json().unwrap()).unwrap();
        assert!(value.get("dailyData").is_some());
        assert!(value.get("tasks").is_some());
        assert!(value.get("customCategories").is_some());
        assert!(value.get("settings").is_some());
        assert_eq!(value["dailyData"][0]["date"], "2026-03-14");
    }

    #[test]
    fn empty_optional_times_render_as_empty_columns() {
        let rec = DailyRecord::new("2026-03-15").unwrap();
        let csv = to_csv(&[rec]);
        let row = csv.lines().nth(1).unwrap();
        let cols: Vec<&str> = row.split(',').collect();
        assert_eq!(cols[1], "");
        assert_eq!(cols[4], "");
    }
}
