use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;
use chrono::Utc;

use crate::api::attachments::{discard_on_error, store_upload};
use crate::api::forms::{read_multipart, FormData, UploadedFile};
use crate::app::AppState;
use crate::auth::session::AdminSession;
use crate::db::models::{new_id, Post};
use crate::db::store::JsonStore;
use crate::error::{ignore_missing, AppError};
use crate::storage::uploads::{release_quietly, UploadStore};

const DEFAULT_TITLE: &str = "Untitled";

/// Fields of the add/edit post form.
#[derive(Debug)]
pub struct PostInput {
    pub title: String,
    pub description: String,
    pub image: Option<UploadedFile>,
}

impl PostInput {
    pub fn from_form(form: FormData) -> Self {
        Self {
            title: form.text_or("title", DEFAULT_TITLE),
            description: form.text_or("description", ""),
            image: form.file,
        }
    }
}

/// Store the image (if any) and append a new post.
pub async fn create_post(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    input: PostInput,
) -> Result<Post, AppError> {
    let image = store_upload(uploads, input.image).await?;

    let post = Post {
        id: new_id(),
        title: input.title,
        description: input.description,
        image: image.clone(),
        created_at: Utc::now(),
    };

    let result = store
        .mutate(|data| {
            data.posts.push(post.clone());
            Ok(())
        })
        .await;
    discard_on_error(uploads, image, result).await?;

    tracing::info!("Created post '{}' ({})", post.title, post.id);
    Ok(post)
}

/// Update title and description; a new image replaces the old one.
pub async fn update_post(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    id: &str,
    input: PostInput,
) -> Result<Post, AppError> {
    let image = store_upload(uploads, input.image).await?;

    let result = store
        .mutate(|data| {
            let post = data
                .find_post_by_id_mut(id)
                .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;
            post.title = input.title;
            post.description = input.description;
            let replaced = match &image {
                Some(name) => post.image.replace(name.clone()),
                None => None,
            };
            Ok((post.clone(), replaced))
        })
        .await;
    let (post, replaced) = discard_on_error(uploads, image, result).await?;

    release_quietly(uploads, replaced).await;
    tracing::info!("Updated post {}", post.id);
    Ok(post)
}

/// Remove a post and release its image.
pub async fn delete_post(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    id: &str,
) -> Result<Post, AppError> {
    let removed = store
        .mutate(|data| {
            data.remove_post(id)
                .ok_or_else(|| AppError::NotFound(format!("post {id}")))
        })
        .await?;

    release_quietly(uploads, removed.image.clone()).await;
    tracing::info!("Deleted post {}", removed.id);
    Ok(removed)
}

/// `POST /admin/posts/add`
pub async fn add_post_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_multipart(multipart, "image").await?;
    create_post(&state.store, state.uploads.as_ref(), PostInput::from_form(form)).await?;
    Ok(Redirect::to("/admin"))
}

/// `POST /admin/posts/edit/{id}`
pub async fn edit_post_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_multipart(multipart, "image").await?;
    ignore_missing(
        update_post(&state.store, state.uploads.as_ref(), &id, PostInput::from_form(form)).await,
    )?;
    Ok(Redirect::to("/admin"))
}

/// `POST /admin/posts/delete/{id}`
pub async fn delete_post_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    ignore_missing(delete_post(&state.store, state.uploads.as_ref(), &id).await)?;
    Ok(Redirect::to("/admin"))
}
