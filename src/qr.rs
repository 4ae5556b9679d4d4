use base64::Engine;
use chrono::{DateTime, Utc};
use qrcode::render::svg;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};

use crate::event::EventType;
use crate::templates::EmbeddedImage;

/// What the certificate's QR code encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPayload {
    pub certificate_id: String,
    pub event_id: String,
    pub event_type: EventType,
    pub issued_date: DateTime<Utc>,
    pub verification_url: String,
}

impl VerificationPayload {
    pub fn new(
        certificate_id: &str,
        event_id: &str,
        event_type: EventType,
        issued_date: DateTime<Utc>,
        verification_base_url: &str,
    ) -> Self {
        Self {
            certificate_id: certificate_id.to_string(),
            event_id: event_id.to_string(),
            event_type,
            issued_date,
            verification_url: format!(
                "{}/verify/{}",
                verification_base_url.trim_end_matches('/'),
                certificate_id
            ),
        }
    }
}

/// SVG QR code of the payload JSON as a `data:` URI.
pub fn qr_image(payload: &VerificationPayload) -> Result<EmbeddedImage, String> {
    let json = serde_json::to_string(payload).map_err(|e| e.to_string())?;
    let code = QrCode::new(json.as_bytes()).map_err(|e| format!("QR encoding failed: {}", e))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    let uri = format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(image)
    );
    EmbeddedImage::new(uri).ok_or_else(|| "QR image is not a data URI".to_string())
}
