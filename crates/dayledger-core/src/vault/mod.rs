//! Tiered storage vault.
//!
//! The vault exposes a uniform asynchronous save/read/list/delete/rename
//! contract while selecting the best available backend once, at open time:
//!
//! 1. Untrusted context (policy flag) -> key-value tier immediately.
//! 2. Otherwise, acquire (creating if absent) the dedicated durable
//!    subdirectory -> durable tier.
//! 3. Any failure acquiring it -> key-value tier.
//!
//! The download tier is never selected at init; it is the save-time
//! fallback when a write to the active tier throws. Every public operation
//! catches backend errors internally: callers only ever see a falsy
//! return (`None`, `false`, `SaveOutcome { ok: false, .. }`).

mod download;
mod durable;
mod keyvalue;

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, VaultError};

use download::DownloadSink;
use durable::DurableDir;
use keyvalue::KvStore;

/// One of the three storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTier {
    Durable,
    KeyValue,
    Download,
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageTier::Durable => "durable",
            StorageTier::KeyValue => "key-value",
            StorageTier::Download => "download",
        };
        f.write_str(s)
    }
}

/// Result of a save. `ok: false` with `storage: Download` means the active
/// tier rejected the write and the content was handed off as a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub ok: bool,
    pub storage: StorageTier,
}

/// A logical file in the vault namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    pub name: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub mime_type: String,
}

/// Binary-capable handle to stored content, for re-sharing.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultBlob {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Where the vault lives and which tiers it may use.
#[derive(Debug, Clone)]
pub struct VaultOptions {
    /// Application data directory.
    pub root: PathBuf,
    /// Name of the dedicated durable subdirectory.
    pub dir_name: String,
    /// Untrusted contexts skip the durable tier entirely.
    pub trusted: bool,
    /// Where the download tier hands files to the user.
    pub export_dir: PathBuf,
}

impl VaultOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            export_dir: root.join("exports"),
            dir_name: "vault".to_string(),
            trusted: true,
            root,
        }
    }
}

#[derive(Debug)]
enum Backend {
    Durable(DurableDir),
    KeyValue(KvStore),
}

/// The storage vault. Tier selection happens once in [`Vault::open`] and is
/// cached for the lifetime of the instance; a tier that failed the probe is
/// assumed failed for the session.
#[derive(Debug)]
pub struct Vault {
    backend: Backend,
    download: DownloadSink,
}

impl Vault {
    /// Open the vault, running the tier-selection protocol.
    ///
    /// # Errors
    ///
    /// Only fails if even the key-value tier cannot be established, that
    /// is, both the on-disk store and the in-memory fallback are unusable.
    pub async fn open(opts: VaultOptions) -> Result<Self, CoreError> {
        let backend = if !opts.trusted {
            tracing::debug!("untrusted context, selecting key-value tier");
            Backend::KeyValue(Self::open_kv(&opts)?)
        } else {
            match DurableDir::acquire(&opts.root, &opts.dir_name).await {
                Ok(dir) => Backend::Durable(dir),
                Err(e) => {
                    tracing::warn!(error = %e, "durable tier unavailable, degrading to key-value");
                    Backend::KeyValue(Self::open_kv(&opts)?)
                }
            }
        };
        Ok(Self {
            backend,
            download: DownloadSink::new(&opts.export_dir),
        })
    }

    fn open_kv(opts: &VaultOptions) -> Result<KvStore, VaultError> {
        match KvStore::open(&opts.root.join("vault.db")) {
            Ok(store) => Ok(store),
            Err(e) => {
                tracing::warn!(error = %e, "on-disk kv store unusable, using in-memory store");
                KvStore::open_memory()
            }
        }
    }

    /// The tier selected at open time.
    pub fn tier(&self) -> StorageTier {
        match self.backend {
            Backend::Durable(_) => StorageTier::Durable,
            Backend::KeyValue(_) => StorageTier::KeyValue,
        }
    }

    /// Directory the download tier writes into.
    pub fn export_dir(&self) -> &std::path::Path {
        self.download.dir()
    }

    /// Serialize `data` as JSON and save it under `name`.
    pub async fn save_json<T: Serialize>(&self, name: &str, data: &T) -> SaveOutcome {
        let text = match serde_json::to_string_pretty(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(name, error = %e, "serialization failed, nothing saved");
                return SaveOutcome {
                    ok: false,
                    storage: self.tier(),
                };
            }
        };
        self.save_text(name, &text, "application/json").await
    }

    /// Save raw text under `name`. Never raises: a write failure on the
    /// active tier falls back to handing the content off as a download.
    pub async fn save_text(&self, name: &str, text: &str, mime_type: &str) -> SaveOutcome {
        if let Err(e) = validate_name(name) {
            tracing::warn!(name, error = %e, "rejected vault name, nothing saved");
            return SaveOutcome {
                ok: false,
                storage: self.tier(),
            };
        }
        match self.backend_write(name, text, mime_type).await {
            Ok(()) => SaveOutcome {
                ok: true,
                storage: self.tier(),
            },
            Err(e) => {
                tracing::warn!(name, tier = %self.tier(), error = %e, "write failed, handing off as download");
                if let Err(e) = self.download.hand_off(name, text.as_bytes()).await {
                    tracing::warn!(name, error = %e, "download hand-off also failed");
                }
                SaveOutcome {
                    ok: false,
                    storage: StorageTier::Download,
                }
            }
        }
    }

    /// Read content for `name`. Absent, malformed, or unreadable entries
    /// all come back as `None`; errors are logged, never thrown.
    pub async fn read(&self, name: &str) -> Option<String> {
        let result = match &self.backend {
            Backend::Durable(dir) => dir
                .read(name)
                .await
                .map(|opt| opt.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())),
            Backend::KeyValue(kv) => kv.get(name).map(|opt| opt.map(|env| env.content)),
        };
        match result {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(name, error = %e, "vault read failed");
                None
            }
        }
    }

    /// Read and JSON-decode `name`. Parse failure is treated as absence.
    pub async fn read_json<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Option<T> {
        let content = self.read(name).await?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(name, error = %e, "stored JSON is malformed, treating as absent");
                None
            }
        }
    }

    /// All entries, sorted by last-modified descending. Empty on error.
    pub async fn list(&self) -> Vec<VaultEntry> {
        let result = match &self.backend {
            Backend::Durable(dir) => dir.list().await,
            Backend::KeyValue(kv) => kv.list(),
        };
        match result {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "vault list failed");
                Vec::new()
            }
        }
    }

    /// Delete `name`. Absence is not an error; returns whether a stored
    /// entry was actually removed.
    pub async fn delete(&self, name: &str) -> bool {
        let result = match &self.backend {
            Backend::Durable(dir) => dir.delete(name).await,
            Backend::KeyValue(kv) => kv.delete(name),
        };
        match result {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(name, error = %e, "vault delete failed");
                false
            }
        }
    }

    /// Rename via read-old, write-new, delete-old. Not atomic: if the
    /// delete fails after the write succeeded, both names persist with
    /// duplicate content. Returns false when the names are equal, the
    /// read comes back empty, or the write fails.
    pub async fn rename(&self, old_name: &str, new_name: &str) -> bool {
        // Renaming onto itself would write and then delete the same key.
        if old_name == new_name || validate_name(new_name).is_err() {
            return false;
        }
        let content = match self.read(old_name).await {
            Some(content) if !content.is_empty() => content,
            _ => return false,
        };
        let mime_type = self.stored_mime(old_name).await;
        if let Err(e) = self.backend_write(new_name, &content, &mime_type).await {
            tracing::warn!(old_name, new_name, error = %e, "rename write failed");
            return false;
        }
        let result = match &self.backend {
            Backend::Durable(dir) => dir.delete(old_name).await,
            Backend::KeyValue(kv) => kv.delete(old_name),
        };
        Self::settle_rename(old_name, result)
    }

    /// The new name is already written at this point, so a failed delete
    /// of the old name leaves duplicate content but never loses the data;
    /// the rename still counts as done.
    fn settle_rename(old_name: &str, delete_result: Result<bool, VaultError>) -> bool {
        if let Err(e) = delete_result {
            tracing::warn!(old_name, error = %e, "rename left both names present");
        }
        true
    }

    /// Binary handle to the content. Mime type is inferred from the
    /// filename extension when the store has none.
    pub async fn get_blob(&self, name: &str) -> Option<VaultBlob> {
        match &self.backend {
            Backend::Durable(dir) => match dir.read(name).await {
                Ok(Some(bytes)) => Some(VaultBlob {
                    bytes,
                    mime_type: mime_for(name).to_string(),
                }),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(name, error = %e, "vault blob read failed");
                    None
                }
            },
            Backend::KeyValue(kv) => match kv.get(name) {
                Ok(Some(env)) => {
                    let mime_type = if env.mime_type.is_empty() {
                        mime_for(name).to_string()
                    } else {
                        env.mime_type
                    };
                    Some(VaultBlob {
                        bytes: env.content.into_bytes(),
                        mime_type,
                    })
                }
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(name, error = %e, "vault blob read failed");
                    None
                }
            },
        }
    }

    async fn backend_write(&self, name: &str, text: &str, mime_type: &str) -> Result<(), VaultError> {
        match &self.backend {
            Backend::Durable(dir) => dir.write(name, text.as_bytes()).await,
            Backend::KeyValue(kv) => kv.set(name, text, mime_type),
        }
    }

    async fn stored_mime(&self, name: &str) -> String {
        if let Backend::KeyValue(kv) = &self.backend {
            if let Ok(Some(env)) = kv.get(name) {
                if !env.mime_type.is_empty() {
                    return env.mime_type;
                }
            }
        }
        mime_for(name).to_string()
    }
}

/// Infer a mime type from the filename extension.
pub(crate) fn mime_for(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("txt") | Some("md") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn validate_name(name: &str) -> Result<(), VaultError> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name == "."
    {
        return Err(VaultError::InvalidName(name.to_string()));
    }
    Ok(())
}
