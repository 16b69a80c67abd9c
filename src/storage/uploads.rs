use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;

/// Attempts at finding a free filename before giving up.
const MAX_NAME_ATTEMPTS: usize = 5;

/// Storage for uploaded images.
///
/// Abstracted as a trait so tests can substitute a failing or recording
/// implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persist `content` under a freshly generated name and return that name.
    async fn store(&self, content: Vec<u8>, original_name: &str) -> Result<String, AppError>;

    /// Delete a stored file. A file that is already gone is not an error.
    async fn release(&self, filename: &str) -> Result<(), AppError>;
}

/// Keeps uploads as plain files in a single directory.
pub struct DiskUploadStore {
    dir: PathBuf,
}

impl DiskUploadStore {
    /// Create the store, creating `dir` if it does not exist yet.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a stored file, rejecting anything that is not a bare name.
    fn path_for(&self, filename: &str) -> Result<PathBuf, AppError> {
        let bare = Path::new(filename).file_name().and_then(|n| n.to_str());
        if filename.is_empty() || bare != Some(filename) {
            return Err(AppError::BadRequest(format!(
                "Invalid upload name '{}'",
                filename
            )));
        }
        Ok(self.dir.join(filename))
    }
}

#[async_trait]
impl UploadStore for DiskUploadStore {
    async fn store(&self, content: Vec<u8>, original_name: &str) -> Result<String, AppError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = generate_filename(original_name);
            let path = self.dir.join(&name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(&content).await?;
                file.sync_all().await
            }
            .await;
            if let Err(e) = written {
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e.into());
            }

            tracing::info!("Stored upload '{}' ({} bytes)", name, content.len());
            return Ok(name);
        }

        Err(AppError::Storage(
            "Could not allocate a unique upload filename".into(),
        ))
    }

    async fn release(&self, filename: &str) -> Result<(), AppError> {
        let path = self.path_for(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Released upload '{}'", filename);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `<unix millis>-<random hex><.ext>`, keeping a sanitized original extension.
pub fn generate_filename(original_name: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let suffix: u64 = rand::random();
    format!("{}-{:016x}{}", timestamp, suffix, sanitized_extension(original_name))
}

fn sanitized_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

/// Release a superseded upload after the owning mutation was persisted.
///
/// The mutation already succeeded, so a failure here only leaves an orphaned
/// file behind and is logged rather than returned.
pub async fn release_quietly(store: &dyn UploadStore, filename: Option<String>) {
    if let Some(name) = filename {
        if let Err(e) = store.release(&name).await {
            tracing::warn!("Failed to release upload '{}': {}", name, e);
        }
    }
}
