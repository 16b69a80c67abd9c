use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRef};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{admins, gallery, pages, posts, social, staff};
use crate::auth::login;
use crate::auth::session::signing_key;
use crate::config::AppConfig;
use crate::db::store::JsonStore;
use crate::error::AppError;
use crate::storage::uploads::{DiskUploadStore, UploadStore};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub uploads: Arc<dyn UploadStore>,
    pub cookie_key: Key,
    pub session_ttl: chrono::Duration,
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    /// Open the data file and upload directory named by `config`.
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        let store = JsonStore::open(&config.data_file).await?;
        let uploads = DiskUploadStore::open(&config.upload_dir).await?;

        Ok(Self {
            store: Arc::new(store),
            uploads: Arc::new(uploads),
            cookie_key: signing_key(config.session_secret.as_deref()),
            session_ttl: chrono::Duration::hours(config.session_ttl_hours),
            config: Arc::new(config),
        })
    }
}

/// Build the full router: public pages, auth, admin actions and uploads.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/", get(pages::dashboard_handler))
        .route("/gallery/upload", post(gallery::upload_handler))
        .route("/gallery/edit/{id}", post(gallery::edit_handler))
        .route("/gallery/delete/{id}", post(gallery::delete_handler))
        .route("/posts/add", post(posts::add_post_handler))
        .route("/posts/edit/{id}", post(posts::edit_post_handler))
        .route("/posts/delete/{id}", post(posts::delete_post_handler))
        .route("/staff/add", post(staff::add_staff_handler))
        .route("/staff/edit/{id}", post(staff::edit_staff_handler))
        .route("/staff/delete/{id}", post(staff::delete_staff_handler))
        .route("/social", post(social::update_social_handler))
        .route("/admins/add", post(admins::add_admin_handler))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    Router::new()
        .route("/", get(pages::home_handler))
        .route("/industry", get(pages::industry_handler))
        .route("/gallery", get(pages::gallery_handler))
        .route("/staff", get(pages::staff_handler))
        .route(
            "/login",
            get(login::login_page_handler).post(login::login_handler),
        )
        .route("/logout", get(login::logout_handler))
        .route("/dashboard", get(|| async { Redirect::permanent("/admin") }))
        .nest("/admin", admin_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
