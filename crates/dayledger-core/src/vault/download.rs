//! Download tier: the save-time last resort.
//!
//! Never selected at init. When a write to the active tier throws, the
//! content is handed to the user as a plain file in the export directory,
//! so a save attempt is never silently lost.

use std::path::{Path, PathBuf};

use crate::error::VaultError;

#[derive(Debug)]
pub(super) struct DownloadSink {
    dir: PathBuf,
}

impl DownloadSink {
    pub(super) fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Write the content where the user can pick it up. Returns the path
    /// of the handed-off file.
    pub(super) async fn hand_off(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, VaultError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub(super) fn dir(&self) -> &Path {
        &self.dir
    }
}
