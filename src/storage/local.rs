//! Local filesystem storage implementation.
//!
//! The whole cache lives in one JSON file that is read once at start and
//! replaced once at the end of a successful run.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{Cache, CacheStore};

/// Cache stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl CacheStore for LocalStorage {
    async fn load(&self) -> Result<Cache> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let cache: Cache = serde_json::from_slice(&bytes)?;
                log::debug!(
                    "Loaded {} cached profiles from {}",
                    cache.len(),
                    self.path.display()
                );
                Ok(cache)
            }
            None => {
                log::warn!("No cache found at {}, starting empty", self.path.display());
                Ok(Cache::new())
            }
        }
    }

    async fn save(&self, cache: &Cache) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cache)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Cache: {} profiles written to {}",
            cache.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
