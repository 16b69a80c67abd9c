use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::db::models::SiteData;
use crate::error::AppError;

/// Flat-file store holding the whole [`SiteData`] document in one JSON file.
///
/// The document is re-read from disk for every operation. Reads share a
/// read lock; [`JsonStore::mutate`] holds the write lock for the whole
/// load-mutate-persist sequence, so two overlapping mutations can never
/// overwrite each other's changes.
pub struct JsonStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonStore {
    /// Open the store at `path`, creating its parent directory if needed.
    ///
    /// The file itself is only created by the first mutation.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the current document, or an empty one if no file exists yet.
    pub async fn load(&self) -> Result<SiteData, AppError> {
        let _guard = self.lock.read().await;
        self.read_file().await
    }

    /// Load, apply `f`, then persist, as one critical section.
    ///
    /// If `f` fails nothing is written and the error is returned unchanged.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut SiteData) -> Result<R, AppError>,
    {
        let _guard = self.lock.write().await;
        let mut data = self.read_file().await?;
        let result = f(&mut data)?;
        self.persist(&data).await?;
        Ok(result)
    }

    async fn read_file(&self) -> Result<SiteData, AppError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SiteData::default()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(SiteData::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write to a sibling temp file, fsync, then rename over the original.
    async fn persist(&self, data: &SiteData) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(data)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
