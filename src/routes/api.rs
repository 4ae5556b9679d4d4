use axum::{
    extract::{Path, State},
    http::{header, HeaderName},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::db;
use crate::error::CertificateError;
use crate::event::{CertificateRequest, Event, RequestingUser};
use crate::producer::GeneratedDocument;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBody {
    pub event: Event,
    pub certificate_request: CertificateRequest,
    pub requesting_user: RequestingUser,
}

/// Issues a certificate for a stored request and approves the request.
/// Already-approved requests are re-issued under a new certificate id.
pub async fn generate_certificate(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GeneratedDocument>, ApiError> {
    let pool = state.pool.as_ref();

    let request_row = db::get_certificate_request(pool, &request_id)
        .await?
        .ok_or_else(|| CertificateError::RequestNotFound(request_id.clone()))?;
    if request_row.status == db::RequestStatus::Rejected.as_str() {
        return Err(CertificateError::RequestRejected(request_id).into());
    }

    let event = db::get_event(pool, &request_row.event_id)
        .await?
        .ok_or_else(|| CertificateError::EventNotFound(request_row.event_id.clone()))?;

    let user = RequestingUser {
        id: body.user_id,
        name: body.user_name,
    };
    let doc = state
        .producer
        .generate(&event, &CertificateRequest::from(&request_row), &user)
        .await?;

    // Approval and the certificate row commit together, or not at all.
    let mut tx = pool.begin().await?;
    if !db::approve_request(&mut *tx, &request_id).await? {
        tx.rollback().await?;
        if let Err(err) = tokio::fs::remove_file(&doc.artifact_path).await {
            tracing::warn!(
                path = %doc.artifact_path.display(),
                error = %err,
                "could not remove refused artifact"
            );
        }
        return Err(CertificateError::RequestRejected(request_id).into());
    }
    db::record_certificate(&mut *tx, &doc).await?;
    tx.commit().await?;

    if request_row.is_pending() {
        tracing::info!(
            request_id = %request_id,
            certificate_id = %doc.certificate_id,
            "request approved"
        );
    } else {
        tracing::info!(
            request_id = %request_id,
            certificate_id = %doc.certificate_id,
            "certificate re-issued"
        );
    }

    Ok(Json(doc))
}

/// Runs generation on caller-supplied records without touching the database.
/// The artifact is rendered into a scratch directory and returned inline, so
/// nothing is left in the certificates folder.
pub async fn preview_certificate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PreviewBody>,
) -> Result<impl IntoResponse, ApiError> {
    let scratch = tempfile::tempdir().map_err(CertificateError::from)?;
    let doc = state
        .producer
        .generate_in(
            scratch.path(),
            &body.event,
            &body.certificate_request,
            &body.requesting_user,
        )
        .await?;
    let content = tokio::fs::read(&doc.artifact_path)
        .await
        .map_err(CertificateError::from)?;

    let headers: [(HeaderName, String); 4] = [
        (header::CONTENT_TYPE, doc.format.mime().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"preview.{}\"", doc.format.extension()),
        ),
        (HeaderName::from_static("x-certificate-id"), doc.certificate_id),
        (
            HeaderName::from_static("x-certificate-format"),
            doc.format.extension().to_string(),
        ),
    ];
    Ok((headers, content))
}

pub async fn download_certificate(
    State(state): State<Arc<AppState>>,
    Path(certificate_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let row = db::get_certificate(state.pool.as_ref(), &certificate_id)
        .await?
        .ok_or_else(|| CertificateError::CertificateNotFound(certificate_id.clone()))?;

    let path = std::path::PathBuf::from(&row.artifact_path);
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                certificate_id = %certificate_id,
                path = %path.display(),
                "artifact missing on disk"
            );
            return Err(CertificateError::CertificateNotFound(certificate_id).into());
        }
        Err(err) => return Err(CertificateError::Io(err).into()),
    };

    let mime = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    let download_name = format!("{}.{}", row.certificate_id, row.format);

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download_name),
            ),
        ],
        content,
    ))
}
