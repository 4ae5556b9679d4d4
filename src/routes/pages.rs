use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use std::sync::Arc;
use tera::Context;

use super::ApiError;
use crate::db::get_certificate;
use crate::event::EventType;
use crate::state::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut ctx = Context::new();
    let event_types: Vec<&str> = EventType::ALL.iter().map(|t| t.as_str()).collect();
    ctx.insert("event_types", &event_types);
    ctx.insert("pdf_engine", state.producer.engine_name());
    render_template(&state, "index.html", ctx)
}

/// Landing page for the URL inside each certificate's QR code.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Path(certificate_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let certificate = get_certificate(state.pool.as_ref(), &certificate_id).await?;

    let mut ctx = Context::new();
    ctx.insert("certificate_id", &certificate_id);
    let status = match &certificate {
        Some(row) => {
            ctx.insert("certificate", row);
            StatusCode::OK
        }
        None => {
            tracing::info!(certificate_id = %certificate_id, "verification of unknown certificate");
            StatusCode::NOT_FOUND
        }
    };
    Ok((status, render_template(&state, "verify.html", ctx)))
}

fn render_template(state: &AppState, name: &str, ctx: Context) -> Html<String> {
    let rendered = state.pages.render(name, &ctx).unwrap_or_else(|err| {
        tracing::error!(template = name, error = %err, "page render failed");
        format!("Template error: {}", name)
    });
    Html(rendered)
}
