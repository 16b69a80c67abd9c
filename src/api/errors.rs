use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::AppError;

/// Builds `path?error=<message>` with the message URL-encoded.
pub fn with_error(path: &str, message: &str) -> String {
    format!("{}?error={}", path, urlencoding::encode(message))
}

/// Converts AppError into the browser-facing response.
///
/// Expected failures redirect back to the originating page; storage and
/// internal failures answer 500 so nothing looks like a successful save.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidCredentials => {
                Redirect::to(&with_error("/login", &self.to_string())).into_response()
            }
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::NotFound(_) => Redirect::to("/admin").into_response(),
            AppError::BadRequest(msg) => {
                Redirect::to(&with_error("/admin", msg)).into_response()
            }
            AppError::Storage(msg) | AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                let body = serde_json::json!({
                    "error": "The request could not be completed"
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}
