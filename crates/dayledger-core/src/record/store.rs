//! Persistence of daily records and the task catalog through the vault.
//!
//! One vault resource per calendar day (`record-YYYY-MM-DD.json`), plus a
//! single `tasks.json` for the catalog. Malformed stored JSON reads as
//! absent, per the vault contract.

use crate::vault::{SaveOutcome, Vault};

use super::catalog::TaskCatalog;
use super::daily::DailyRecord;

const RECORD_PREFIX: &str = "record-";
const CATALOG_NAME: &str = "tasks.json";

/// Vault-backed store for the daily-record aggregate.
pub struct RecordStore<'a> {
    vault: &'a Vault,
}

impl<'a> RecordStore<'a> {
    pub fn new(vault: &'a Vault) -> Self {
        Self { vault }
    }

    fn record_name(date: &str) -> String {
        format!("{RECORD_PREFIX}{date}.json")
    }

    pub async fn load(&self, date: &str) -> Option<DailyRecord> {
        self.vault.read_json(&Self::record_name(date)).await
    }

    /// Load the record for `date`, or a fresh one if absent. The date key
    /// must already be validated (`DailyRecord::new` enforces the format).
    pub async fn load_or_new(&self, date: &str) -> Result<DailyRecord, crate::error::CoreError> {
        match self.load(date).await {
            Some(record) => Ok(record),
            None => Ok(DailyRecord::new(date)?),
        }
    }

    pub async fn save(&self, record: &DailyRecord) -> SaveOutcome {
        self.vault
            .save_json(&Self::record_name(&record.date), record)
            .await
    }

    /// All stored records, ascending by date key.
    pub async fn all(&self) -> Vec<DailyRecord> {
        let mut records = Vec::new();
        for entry in self.vault.list().await {
            if !entry.name.starts_with(RECORD_PREFIX) || !entry.name.ends_with(".json") {
                continue;
            }
            if let Some(record) = self.vault.read_json::<DailyRecord>(&entry.name).await {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.date.cmp(&b.date));
        records
    }

    pub async fn load_catalog(&self) -> TaskCatalog {
        self.vault
            .read_json(CATALOG_NAME)
            .await
            .unwrap_or_else(TaskCatalog::with_defaults)
    }

    pub async fn save_catalog(&self, catalog: &TaskCatalog) -> SaveOutcome {
        self.vault.save_json(CATALOG_NAME, catalog).await
    }
}
