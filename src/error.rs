use thiserror::Error;

use crate::calendar::CalendarError;

pub type Result<T, E = CertificateError> = std::result::Result<T, E>;

/// Failures surfaced by certificate generation and the service around it.
///
/// Field-level problems (bad dates, missing aliases, missing photos) never
/// show up here; they degrade to empty values during normalization.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("event '{0}' not found")]
    EventNotFound(String),
    #[error("certificate request '{0}' not found")]
    RequestNotFound(String),
    #[error("certificate '{0}' not found")]
    CertificateNotFound(String),
    #[error("unsupported event type '{0}'")]
    UnsupportedEventType(String),
    #[error("certificate request '{0}' was rejected")]
    RequestRejected(String),
    #[error("template error: {0}")]
    Template(String),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl CertificateError {
    /// Contract errors are rejected before any work happens.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound(_) | Self::RequestNotFound(_) | Self::CertificateNotFound(_)
        )
    }
}
