use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;

use crate::api::attachments::discard_on_error;
use crate::api::forms::{read_multipart, UploadedFile};
use crate::app::AppState;
use crate::auth::session::AdminSession;
use crate::db::models::{new_id, GalleryItem};
use crate::db::store::JsonStore;
use crate::error::{ignore_missing, AppError};
use crate::storage::uploads::{release_quietly, UploadStore};

/// Store the image and append a gallery item. The image is required.
pub async fn create_gallery_item(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    image: Option<UploadedFile>,
    caption: Option<String>,
) -> Result<GalleryItem, AppError> {
    let image = image.ok_or_else(|| AppError::BadRequest("Please choose an image to upload".into()))?;
    let filename = uploads.store(image.data, &image.file_name).await?;

    let item = GalleryItem {
        id: new_id(),
        filename,
        caption,
    };

    let result = store
        .mutate(|data| {
            data.gallery.push(item.clone());
            Ok(())
        })
        .await;
    discard_on_error(uploads, Some(item.filename.clone()), result).await?;

    tracing::info!("Added gallery item {} ({})", item.id, item.filename);
    Ok(item)
}

pub async fn update_gallery_caption(
    store: &JsonStore,
    id: &str,
    caption: Option<String>,
) -> Result<GalleryItem, AppError> {
    let item = store
        .mutate(|data| {
            let item = data
                .find_gallery_item_by_id_mut(id)
                .ok_or_else(|| AppError::NotFound(format!("gallery item {id}")))?;
            item.caption = caption;
            Ok(item.clone())
        })
        .await?;

    tracing::info!("Updated caption of gallery item {}", item.id);
    Ok(item)
}

pub async fn delete_gallery_item(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    id: &str,
) -> Result<GalleryItem, AppError> {
    let removed = store
        .mutate(|data| {
            data.remove_gallery_item(id)
                .ok_or_else(|| AppError::NotFound(format!("gallery item {id}")))
        })
        .await?;

    release_quietly(uploads, Some(removed.filename.clone())).await;
    tracing::info!("Deleted gallery item {}", removed.id);
    Ok(removed)
}

/// `POST /admin/gallery/upload`
pub async fn upload_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_multipart(multipart, "image").await?;
    let caption = form.text("caption");
    create_gallery_item(&state.store, state.uploads.as_ref(), form.file, caption).await?;
    Ok(Redirect::to("/admin"))
}

/// `POST /admin/gallery/edit/{id}`
pub async fn edit_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_multipart(multipart, "image").await?;
    ignore_missing(update_gallery_caption(&state.store, &id, form.text("caption")).await)?;
    Ok(Redirect::to("/admin"))
}

/// `POST /admin/gallery/delete/{id}`
pub async fn delete_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    ignore_missing(delete_gallery_item(&state.store, state.uploads.as_ref(), &id).await)?;
    Ok(Redirect::to("/admin"))
}
