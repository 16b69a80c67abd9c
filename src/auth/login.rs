use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};

use crate::api::errors::with_error;
use crate::api::pages::ErrorQuery;
use crate::app::AppState;
use crate::auth::models::Session;
use crate::auth::password::verify_password_blocking;
use crate::auth::session::{current_session, end_session, start_session};
use crate::db::store::JsonStore;
use crate::error::AppError;

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// What the login page needs to render.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginView {
    pub error: Option<String>,
    /// Set when the visitor already holds a valid session cookie.
    pub username: Option<String>,
}

/// Check credentials against the stored admins.
///
/// Unknown users and wrong passwords fail identically, including in the
/// amount of hashing work done.
pub async fn authenticate(store: &JsonStore, username: &str, password: &str) -> Result<Session, AppError> {
    let data = store.load().await?;
    let hash = data
        .find_admin_by_username(username)
        .map(|admin| admin.password_hash.clone());

    if verify_password_blocking(hash, password.to_string()).await? {
        Ok(Session::Authenticated {
            username: username.to_string(),
        })
    } else {
        Err(AppError::InvalidCredentials)
    }
}

/// `GET /login`
pub async fn login_page_handler(
    jar: SignedCookieJar,
    Query(query): Query<ErrorQuery>,
) -> Json<LoginView> {
    let username = current_session(&jar).username().map(str::to_string);
    Json(LoginView {
        error: query.error,
        username,
    })
}

/// `POST /login`
///
/// On success stores the session cookie and redirects to the dashboard; on
/// failure redirects back to the login page with a generic error.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(req): Form<LoginRequest>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    match authenticate(&state.store, &req.username, &req.password).await {
        Ok(_) => {
            tracing::info!("Admin '{}' logged in", req.username);
            let jar = start_session(jar, &req.username, state.session_ttl);
            Ok((jar, Redirect::to("/admin")))
        }
        Err(AppError::InvalidCredentials) => {
            tracing::warn!("Failed login attempt for '{}'", req.username);
            // Drop any previous session so a failed login always leaves us anonymous.
            let target = with_error("/login", &AppError::InvalidCredentials.to_string());
            Ok((end_session(jar), Redirect::to(&target)))
        }
        Err(e) => Err(e),
    }
}

/// `GET /logout`
pub async fn logout_handler(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    if let Some(username) = current_session(&jar).username() {
        tracing::info!("Admin '{}' logged out", username);
    }
    (end_session(jar), Redirect::to("/login"))
}
