mod models;

pub use models::*;

use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use std::sync::Arc;

use crate::event::Event;
use crate::producer::GeneratedDocument;

pub type DbPool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub async fn get_event(pool: &PgPool, event_id: &str) -> Result<Option<Event>, sqlx::Error> {
    let row = sqlx::query_as::<_, EventRow>(
        "SELECT id, event_type, data, created_at FROM events WHERE id = $1",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Event::from))
}

pub async fn get_certificate_request(
    pool: &PgPool,
    request_id: &str,
) -> Result<Option<CertificateRequestRow>, sqlx::Error> {
    sqlx::query_as::<_, CertificateRequestRow>(
        "SELECT * FROM certificate_requests WHERE id = $1",
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await
}

pub async fn record_certificate<'e, E>(
    executor: E,
    doc: &GeneratedDocument,
) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let artifact_path = doc.artifact_path.to_string_lossy().into_owned();
    sqlx::query(
        r#"
        INSERT INTO certificates
            (certificate_id, event_id, request_id, event_type, format,
             artifact_path, qr_payload, issued_by, issued_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(&doc.certificate_id)
    .bind(&doc.event_id)
    .bind(&doc.request_id)
    .bind(doc.event_type.as_str())
    .bind(doc.format.extension())
    .bind(artifact_path)
    .bind(Json(&doc.qr_payload))
    .bind(&doc.issued_by)
    .bind(doc.issued_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Marks a request approved unless it has been rejected. Returns `false`
/// when the request is rejected or gone. The update holds the row lock until
/// the surrounding transaction ends, so a concurrent rejection either wins
/// before this runs or waits for the issuance to commit.
pub async fn approve_request<'e, E>(
    executor: E,
    request_id: &str,
) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE certificate_requests
        SET status = 'approved', updated_at = NOW()
        WHERE id = $1 AND status IN ('pending', 'approved')
        "#,
    )
    .bind(request_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn get_certificate(
    pool: &PgPool,
    certificate_id: &str,
) -> Result<Option<CertificateRow>, sqlx::Error> {
    sqlx::query_as::<_, CertificateRow>(
        "SELECT * FROM certificates WHERE certificate_id = $1",
    )
    .bind(certificate_id)
    .fetch_optional(pool)
    .await
}
