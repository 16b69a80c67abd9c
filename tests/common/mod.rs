#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use tempfile::TempDir;

use betteh::app::{build_router, AppState};
use betteh::bootstrap::seed_admin;
use betteh::config::AppConfig;
use betteh::db::models::SiteData;

pub const ADMIN_USERNAME: &str = "betteh";
pub const ADMIN_PASSWORD: &str = "Secret1";

/// A fully wired application backed by a temporary directory.
///
/// The directory (data file and uploads) is removed when this is dropped.
pub struct TestEnv {
    _dir: TempDir,
    pub state: AppState,
    pub router: Router,
    pub upload_dir: PathBuf,
}

impl TestEnv {
    /// Start with the bootstrap admin `betteh` / `Secret1` seeded.
    pub async fn start() -> Self {
        Self::start_with(Some((ADMIN_USERNAME, ADMIN_PASSWORD))).await
    }

    pub async fn start_with(bootstrap: Option<(&str, &str)>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("uploads");

        let config = AppConfig {
            session_secret: Some("test-session-secret".to_string()),
            admin_username: bootstrap.map(|(u, _)| u.to_string()),
            admin_password: bootstrap.map(|(_, p)| p.to_string()),
            data_file: dir.path().join("db.json"),
            upload_dir: upload_dir.clone(),
            ..AppConfig::default()
        };

        let state = AppState::new(config)
            .await
            .expect("Failed to build app state");
        seed_admin(&state.store, &state.config)
            .await
            .expect("Failed to seed admin");

        let router = build_router(state.clone());

        Self {
            _dir: dir,
            state,
            router,
            upload_dir,
        }
    }

    /// A `TestServer` that keeps cookies between requests, like a browser.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .build(self.router.clone())
    }

    /// Log in as the bootstrap admin.
    pub async fn login(&self, server: &axum_test::TestServer) -> axum_test::TestResponse {
        server
            .post("/login")
            .form(&[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
            .await
    }

    /// The current persisted document.
    pub async fn data(&self) -> SiteData {
        self.state.store.load().await.expect("Failed to load data")
    }

    pub fn upload_exists(&self, name: &str) -> bool {
        self.upload_dir.join(name).is_file()
    }

    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// The `Location` header of a redirect response.
pub fn location(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get("location")
        .expect("Response should be a redirect")
        .to_str()
        .unwrap()
        .to_string()
}

/// A minimal 1x1 PNG.
pub fn png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, // bit depth, color type, CRC
        0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
        0x08, 0xD7, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, // compressed data
        0x00, 0x02, 0x00, 0x01, 0xE2, 0x21, 0xBC, 0x33, // CRC
        0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND chunk
        0xAE, 0x42, 0x60, 0x82,
    ]
}

/// A PNG file part with the given file name.
pub fn image_part(name: &str) -> axum_test::multipart::Part {
    axum_test::multipart::Part::bytes(png_bytes())
        .file_name(name.to_string())
        .mime_type("image/png")
}
