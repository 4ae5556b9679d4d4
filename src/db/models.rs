use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::event::{CertificateRequest, Event};

#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: String,
    pub event_type: String,
    pub data: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let data = match row.data.0 {
            serde_json::Value::Object(map) => map,
            other => {
                tracing::warn!(event_id = %row.id, kind = ?other, "event data is not an object");
                Default::default()
            }
        };
        Event {
            id: row.id,
            event_type: row.event_type,
            data,
            created_at: Some(row.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, FromRow, Serialize)]
pub struct CertificateRequestRow {
    pub id: String,
    pub event_id: String,
    pub requested_by: String,
    pub verification_image: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CertificateRequestRow {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending.as_str()
    }
}

impl From<&CertificateRequestRow> for CertificateRequest {
    fn from(row: &CertificateRequestRow) -> Self {
        CertificateRequest {
            id: row.id.clone(),
            requested_by: row.requested_by.clone(),
            verification_image: row.verification_image.clone(),
        }
    }
}

#[derive(Debug, FromRow, Serialize)]
pub struct CertificateRow {
    pub certificate_id: String,
    pub event_id: String,
    pub request_id: String,
    pub event_type: String,
    pub format: String,
    pub artifact_path: String,
    pub qr_payload: Json<serde_json::Value>,
    pub issued_by: String,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_row_keeps_object_data() {
        let row = EventRow {
            id: "ev-1".into(),
            event_type: "death".into(),
            data: Json(json!({ "deceasedNameEn": "Kebede" })),
            created_at: Utc::now(),
        };
        let event = Event::from(row);
        assert_eq!(event.data["deceasedNameEn"], "Kebede");
        assert!(event.created_at.is_some());
    }

    #[test]
    fn non_object_data_becomes_empty() {
        let row = EventRow {
            id: "ev-2".into(),
            event_type: "birth".into(),
            data: Json(json!(["not", "a", "record"])),
            created_at: Utc::now(),
        };
        assert!(Event::from(row).data.is_empty());
    }
}
