//! Implements the `Storage` trait with one JSON file per key.

use crate::storage::Storage;
use crate::{utils, Result};
use anyhow::Context;
use std::path::PathBuf;
use tracing::trace;

/// Stores the value of `key` in `<dir>/<key>.json`. A write goes to `<key>.json.tmp` first and is
/// then renamed over the old file, so a crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.tmp"))
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        trace!("read {}", path.display());
        utils::read_if_exists(&path).await
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path(key);
        trace!("write {} bytes to {}", value.len(), path.display());
        utils::make_dir(&self.dir)
            .await
            .context("Unable to create the data directory")?;
        let temp = self.temp_path(key);
        utils::write(&temp, value).await?;
        utils::rename(&temp, &path).await
    }

    async fn delete(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            let path = self.path(key);
            trace!("delete {}", path.display());
            utils::remove(&path).await?;
        }
        Ok(())
    }
}
