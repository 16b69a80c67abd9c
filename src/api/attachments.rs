//! Upload lifecycle around a store mutation.
//!
//! New files are written before the mutation that references them. If that
//! mutation fails the fresh file is released again; files the mutation
//! replaced or removed are released only after it was persisted.

use crate::api::forms::UploadedFile;
use crate::error::AppError;
use crate::storage::uploads::{release_quietly, UploadStore};

/// Store an optional uploaded file, returning its generated name.
pub async fn store_upload(
    uploads: &dyn UploadStore,
    file: Option<UploadedFile>,
) -> Result<Option<String>, AppError> {
    match file {
        Some(file) => Ok(Some(uploads.store(file.data, &file.file_name).await?)),
        None => Ok(None),
    }
}

/// Release `fresh` if `result` is an error, then hand `result` back.
pub async fn discard_on_error<T>(
    uploads: &dyn UploadStore,
    fresh: Option<String>,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    if result.is_err() {
        release_quietly(uploads, fresh).await;
    }
    result
}
