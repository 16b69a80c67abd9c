use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::password::hash_password_blocking;
use crate::auth::session::AdminSession;
use crate::db::models::{new_id, Admin};
use crate::db::store::JsonStore;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct AdminForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Create an admin account. Usernames are unique and compared exactly.
pub async fn create_admin(store: &JsonStore, username: &str, password: &str) -> Result<Admin, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    // Hash outside the store lock; it is the slow part.
    let password_hash = hash_password_blocking(password.to_string()).await?;
    let admin = Admin {
        id: new_id(),
        username: username.to_string(),
        password_hash,
    };

    store
        .mutate(|data| {
            if data.find_admin_by_username(&admin.username).is_some() {
                return Err(AppError::BadRequest(format!(
                    "Admin '{}' already exists",
                    admin.username
                )));
            }
            data.admins.push(admin.clone());
            Ok(())
        })
        .await?;

    tracing::info!("Created admin '{}'", admin.username);
    Ok(admin)
}

/// `POST /admin/admins/add`
pub async fn add_admin_handler(
    State(state): State<AppState>,
    admin: AdminSession,
    Form(form): Form<AdminForm>,
) -> Result<Redirect, AppError> {
    let created = create_admin(&state.store, &form.username, &form.password).await?;
    tracing::info!("Admin '{}' added by '{}'", created.username, admin.username);
    Ok(Redirect::to("/admin"))
}
