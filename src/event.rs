//! Inputs to certificate generation, as handed over by the registry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CertificateError;

/// Raw event data. Keys vary by form, language suffix and record type.
pub type SourceRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Birth,
    Marriage,
    Death,
    Divorce,
}

impl EventType {
    pub const ALL: [EventType; 4] = [Self::Birth, Self::Marriage, Self::Death, Self::Divorce];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Marriage => "marriage",
            Self::Death => "death",
            Self::Divorce => "divorce",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CertificateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "birth" => Ok(Self::Birth),
            "marriage" => Ok(Self::Marriage),
            "death" => Ok(Self::Death),
            "divorce" => Ok(Self::Divorce),
            _ => Err(CertificateError::UnsupportedEventType(s.to_string())),
        }
    }
}

/// A registered civil-status event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    /// Kept as text so unknown types are rejected by generation, not by parsing.
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: SourceRecord,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub id: String,
    pub requested_by: String,
    #[serde(default)]
    pub verification_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestingUser {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_parsing_is_case_insensitive() {
        assert_eq!("Birth".parse::<EventType>().unwrap(), EventType::Birth);
        assert_eq!(" DIVORCE ".parse::<EventType>().unwrap(), EventType::Divorce);
        assert!(matches!(
            "adoption".parse::<EventType>(),
            Err(CertificateError::UnsupportedEventType(t)) if t == "adoption"
        ));
    }

    #[test]
    fn event_deserializes_from_camel_case() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "ev-1",
            "type": "birth",
            "data": { "childNameEn": "Abebe" },
            "createdAt": "2021-12-22T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(event.event_type, "birth");
        assert_eq!(event.data["childNameEn"], "Abebe");
        assert!(event.created_at.is_some());
    }
}
