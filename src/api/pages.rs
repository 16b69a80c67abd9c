//! Public read-only pages and the admin dashboard, as JSON view models.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::session::AdminSession;
use crate::db::models::{AdminSummary, GalleryItem, Post, SiteData, SocialLinks, StaffMember};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeView {
    pub posts: Vec<Post>,
    pub social: SocialLinks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndustryView {
    pub social: SocialLinks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GalleryView {
    pub gallery: Vec<GalleryItem>,
    pub social: SocialLinks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StaffView {
    pub staff: Vec<StaffMember>,
    pub social: SocialLinks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub username: String,
    pub posts: Vec<Post>,
    pub gallery: Vec<GalleryItem>,
    pub staff: Vec<StaffMember>,
    pub social: SocialLinks,
    pub admins: Vec<AdminSummary>,
    /// Message from a failed form submission, echoed from the query string.
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

/// `GET /`
pub async fn home_handler(State(state): State<AppState>) -> Result<Json<HomeView>, AppError> {
    let SiteData { posts, social, .. } = state.store.load().await?;
    Ok(Json(HomeView { posts, social }))
}

/// `GET /industry`
pub async fn industry_handler(State(state): State<AppState>) -> Result<Json<IndustryView>, AppError> {
    let social = state.store.load().await?.social;
    Ok(Json(IndustryView { social }))
}

/// `GET /gallery`
pub async fn gallery_handler(State(state): State<AppState>) -> Result<Json<GalleryView>, AppError> {
    let SiteData { gallery, social, .. } = state.store.load().await?;
    Ok(Json(GalleryView { gallery, social }))
}

/// `GET /staff`
pub async fn staff_handler(State(state): State<AppState>) -> Result<Json<StaffView>, AppError> {
    let SiteData { staff, social, .. } = state.store.load().await?;
    Ok(Json(StaffView { staff, social }))
}

/// `GET /admin`
pub async fn dashboard_handler(
    State(state): State<AppState>,
    admin: AdminSession,
    Query(query): Query<ErrorQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let data = state.store.load().await?;
    Ok(Json(DashboardView {
        username: admin.username,
        admins: data.admins.iter().map(AdminSummary::from).collect(),
        posts: data.posts,
        gallery: data.gallery,
        staff: data.staff,
        social: data.social,
        error: query.error,
    }))
}
