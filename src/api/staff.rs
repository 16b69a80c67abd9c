use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;

use crate::api::attachments::{discard_on_error, store_upload};
use crate::api::forms::{read_multipart, FormData, UploadedFile};
use crate::app::AppState;
use crate::auth::session::AdminSession;
use crate::db::models::{new_id, StaffMember};
use crate::db::store::JsonStore;
use crate::error::{ignore_missing, AppError};
use crate::storage::uploads::{release_quietly, UploadStore};

#[derive(Debug)]
pub struct StaffInput {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub photo: Option<UploadedFile>,
}

impl StaffInput {
    pub fn from_form(form: FormData) -> Self {
        Self {
            name: form.text_or("name", "Unnamed"),
            title: form.text_or("title", ""),
            bio: form.text_or("bio", ""),
            photo: form.file,
        }
    }
}

pub async fn create_staff_member(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    input: StaffInput,
) -> Result<StaffMember, AppError> {
    let photo = store_upload(uploads, input.photo).await?;

    let member = StaffMember {
        id: new_id(),
        name: input.name,
        title: input.title,
        bio: input.bio,
        photo: photo.clone(),
    };

    let result = store
        .mutate(|data| {
            data.staff.push(member.clone());
            Ok(())
        })
        .await;
    discard_on_error(uploads, photo, result).await?;

    tracing::info!("Added staff member '{}' ({})", member.name, member.id);
    Ok(member)
}

/// Overwrite the text fields; a new photo replaces (and releases) the old one.
pub async fn update_staff_member(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    id: &str,
    input: StaffInput,
) -> Result<StaffMember, AppError> {
    let photo = store_upload(uploads, input.photo).await?;

    let result = store
        .mutate(|data| {
            let member = data
                .find_staff_member_by_id_mut(id)
                .ok_or_else(|| AppError::NotFound(format!("staff member {id}")))?;
            member.name = input.name;
            member.title = input.title;
            member.bio = input.bio;
            let replaced = match &photo {
                Some(name) => member.photo.replace(name.clone()),
                None => None,
            };
            Ok((member.clone(), replaced))
        })
        .await;
    let (member, replaced) = discard_on_error(uploads, photo, result).await?;

    release_quietly(uploads, replaced).await;
    tracing::info!("Updated staff member {}", member.id);
    Ok(member)
}

pub async fn delete_staff_member(
    store: &JsonStore,
    uploads: &dyn UploadStore,
    id: &str,
) -> Result<StaffMember, AppError> {
    let removed = store
        .mutate(|data| {
            data.remove_staff_member(id)
                .ok_or_else(|| AppError::NotFound(format!("staff member {id}")))
        })
        .await?;

    release_quietly(uploads, removed.photo.clone()).await;
    tracing::info!("Deleted staff member {}", removed.id);
    Ok(removed)
}

/// `POST /admin/staff/add`
pub async fn add_staff_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_multipart(multipart, "photo").await?;
    create_staff_member(&state.store, state.uploads.as_ref(), StaffInput::from_form(form)).await?;
    Ok(Redirect::to("/admin"))
}

/// `POST /admin/staff/edit/{id}`
pub async fn edit_staff_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_multipart(multipart, "photo").await?;
    ignore_missing(
        update_staff_member(&state.store, state.uploads.as_ref(), &id, StaffInput::from_form(form))
            .await,
    )?;
    Ok(Redirect::to("/admin"))
}

/// `POST /admin/staff/delete/{id}`
pub async fn delete_staff_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    ignore_missing(delete_staff_member(&state.store, state.uploads.as_ref(), &id).await)?;
    Ok(Redirect::to("/admin"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::uploads::MockUploadStore;

    #[test]
    fn test_defaults() {
        let input = StaffInput::from_form(FormData::with_fields(&[("bio", "Keys")]));
        assert_eq!(input.name, "Unnamed");
        assert_eq!(input.title, "");
        assert_eq!(input.bio, "Keys");
    }

    #[tokio::test]
    async fn test_update_keeps_photo_when_none_uploaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("db.json")).await.unwrap();
        let mut uploads = MockUploadStore::new();
        uploads
            .expect_store()
            .times(1)
            .returning(|_, _| Ok("portrait.jpg".to_string()));
        uploads.expect_release().never();

        let member = create_staff_member(
            &store,
            &uploads,
            StaffInput {
                name: "Ama".into(),
                title: "Manager".into(),
                bio: String::new(),
                photo: Some(UploadedFile {
                    file_name: "me.jpg".into(),
                    content_type: "image/jpeg".into(),
                    data: vec![0xff, 0xd8],
                }),
            },
        )
        .await
        .unwrap();

        let updated = update_staff_member(
            &store,
            &uploads,
            &member.id,
            StaffInput {
                name: "Ama K.".into(),
                title: "Director".into(),
                bio: "Runs the label".into(),
                photo: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.photo.as_deref(), Some("portrait.jpg"));
        assert_eq!(updated.title, "Director");
    }
}
