//! Durable tier: raw files in a dedicated subdirectory of the data dir.
//!
//! Content is stored as plain bytes; last-modified and size come from
//! filesystem metadata, and the mime type is inferred from the extension.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::VaultError;

use super::{mime_for, VaultEntry};

#[derive(Debug)]
pub(super) struct DurableDir {
    dir: PathBuf,
}

impl DurableDir {
    /// Acquire (creating if absent) the named vault subdirectory.
    pub(super) async fn acquire(root: &Path, name: &str) -> Result<Self, VaultError> {
        let dir = root.join(name);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| VaultError::AcquireFailed {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub(super) async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), VaultError> {
        tokio::fs::write(self.path_for(name), bytes).await?;
        Ok(())
    }

    pub(super) async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, VaultError> {
        match tokio::fs::read(self.path_for(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(super) async fn delete(&self, name: &str) -> Result<bool, VaultError> {
        match tokio::fs::remove_file(self.path_for(name)).await {
            Ok(()) => Ok(true),
            // Absence is not an error, just an unsuccessful delete.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub(super) async fn list(&self) -> Result<Vec<VaultEntry>, VaultError> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        while let Some(item) = dir.next_entry().await? {
            let meta = item.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let name = item.file_name().to_string_lossy().to_string();
            let last_modified: DateTime<Utc> = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            entries.push(VaultEntry {
                mime_type: mime_for(&name).to_string(),
                name,
                last_modified,
                size: meta.len(),
            });
        }
        Ok(entries)
    }
}
