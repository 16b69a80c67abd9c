use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::session::AdminSession;
use crate::db::models::SocialLinks;
use crate::db::store::JsonStore;
use crate::error::AppError;

/// The social links form. Absent or blank fields clear the link.
#[derive(Debug, Default, Deserialize)]
pub struct SocialForm {
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub tiktok: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<SocialForm> for SocialLinks {
    fn from(form: SocialForm) -> Self {
        Self {
            facebook: non_blank(form.facebook),
            instagram: non_blank(form.instagram),
            tiktok: non_blank(form.tiktok),
            youtube: non_blank(form.youtube),
        }
    }
}

/// Replace the stored links wholesale; nothing is merged.
pub async fn save_social_links(store: &JsonStore, links: SocialLinks) -> Result<SocialLinks, AppError> {
    store
        .mutate(|data| {
            data.social = links.clone();
            Ok(())
        })
        .await?;
    tracing::info!("Social links updated");
    Ok(links)
}

/// `POST /admin/social`
pub async fn update_social_handler(
    State(state): State<AppState>,
    _admin: AdminSession,
    Form(form): Form<SocialForm>,
) -> Result<Redirect, AppError> {
    save_social_links(&state.store, form.into()).await?;
    Ok(Redirect::to("/admin"))
}
