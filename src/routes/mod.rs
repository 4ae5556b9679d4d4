mod api;
mod pages;

pub use api::{download_certificate, generate_certificate, preview_certificate};
pub use pages::{index, verify};

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::CertificateError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/certificate-requests/:request_id/generate", post(generate_certificate))
        .route("/api/certificates/preview", post(preview_certificate))
        .route("/certificates/:certificate_id/download", get(download_certificate))
        .route("/verify/:certificate_id", get(verify))
        .nest_service("/static", ServeDir::new("static"))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_folder))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JSON error body with a status derived from the failure kind.
pub struct ApiError(CertificateError);

impl From<CertificateError> for ApiError {
    fn from(err: CertificateError) -> Self {
        Self(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self(CertificateError::Database(err))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            CertificateError::UnsupportedEventType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CertificateError::RequestRejected(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::info!(error = %self.0, %status, "request refused");
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}
