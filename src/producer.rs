//! Certificate generation end to end: id, QR code, normalization, template
//! rendering and the PDF-or-HTML artifact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::bilingual::BilingualText;
use crate::error::Result;
use crate::event::{CertificateRequest, Event, EventType, RequestingUser};
use crate::normalize::{
    layout_for, CanonicalCertificateRecord, IssueContext, PhotoSlot, RecordNormalizer,
};
use crate::pdf::{ArtifactFormat, PdfEngine, RenderJob, RenderOutcome};
use crate::qr::{qr_image, VerificationPayload};
use crate::storage::{self, embed, PhotoResolver};
use crate::templates::{EmbeddedImage, SpecialTokens, TemplateRenderer, TemplateStore};

/// Where artifacts go and the URL prefixes the templates see.
#[derive(Debug, Clone)]
pub struct ProducerSettings {
    pub certificates_dir: PathBuf,
    pub assets_base: String,
    pub uploads_base: String,
    pub verification_base_url: String,
}

/// Result of one successful `generate` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub certificate_id: String,
    pub event_id: String,
    pub request_id: String,
    pub event_type: EventType,
    pub format: ArtifactFormat,
    pub artifact_path: PathBuf,
    pub qr_payload: VerificationPayload,
    pub issued_by: String,
    pub issued_at: DateTime<Utc>,
    /// Why the PDF engine was skipped, when `format` is `html`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

pub struct DocumentProducer {
    normalizer: RecordNormalizer,
    templates: TemplateStore,
    renderer: TemplateRenderer,
    photos: PhotoResolver,
    engine: Arc<dyn PdfEngine>,
    settings: ProducerSettings,
}

impl DocumentProducer {
    pub fn new(
        normalizer: RecordNormalizer,
        templates: TemplateStore,
        photos: PhotoResolver,
        engine: Arc<dyn PdfEngine>,
        settings: ProducerSettings,
    ) -> Self {
        Self {
            normalizer,
            templates,
            renderer: TemplateRenderer,
            photos,
            engine,
            settings,
        }
    }

    pub fn settings(&self) -> &ProducerSettings {
        &self.settings
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Produces one certificate artifact.
    ///
    /// Every call mints a fresh certificate id, so repeated calls for the
    /// same request yield separate artifacts. A failing PDF engine is not an
    /// error: the rendered HTML is stored instead.
    pub async fn generate(
        &self,
        event: &Event,
        request: &CertificateRequest,
        user: &RequestingUser,
    ) -> Result<GeneratedDocument> {
        self.generate_in(&self.settings.certificates_dir, event, request, user)
            .await
    }

    /// Like [`generate`](Self::generate), but writes the artifact into `dir`
    /// instead of the certificates directory. Used for previews that must
    /// not leave an unrecorded certificate behind.
    pub async fn generate_in(
        &self,
        dir: &Path,
        event: &Event,
        request: &CertificateRequest,
        user: &RequestingUser,
    ) -> Result<GeneratedDocument> {
        let event_type: EventType = event.event_type.parse()?;
        let template = self.templates.load(event_type)?;

        let certificate_id = storage::generate_certificate_id();
        let issued_at = Utc::now();
        let payload = VerificationPayload::new(
            &certificate_id,
            &event.id,
            event_type,
            issued_at,
            &self.settings.verification_base_url,
        );
        let qr_code = match qr_image(&payload) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(certificate_id = %certificate_id, error = %err, "QR code unavailable");
                None
            }
        };

        let ctx = IssueContext {
            certificate_id: certificate_id.clone(),
            event_id: event.id.clone(),
            request_id: request.id.clone(),
            issued_by: user.name.clone(),
            issued_on: issued_at.date_naive(),
            registered_on: event.created_at.map(|at| at.date_naive()),
        };
        let record = self.normalizer.normalize(&event.data, event_type, &ctx);

        let layout = layout_for(event_type);
        let tokens = SpecialTokens {
            qr_code,
            assets_base: self.settings.assets_base.clone(),
            uploads_base: self.settings.uploads_base.clone(),
            certificate_type: BilingualText::new(layout.title_en, layout.title_am),
            photos: self.embed_photos(&record, request),
        };
        let html = self.renderer.render(&template, &record, &tokens);

        let outcome = self
            .render_artifact(dir, &certificate_id, &html, &record)
            .await?;
        let fallback_reason = match &outcome {
            RenderOutcome::Pdf { .. } => None,
            RenderOutcome::HtmlFallback { reason, .. } => Some(reason.clone()),
        };
        info!(
            certificate_id = %certificate_id,
            event_id = %event.id,
            request_id = %request.id,
            %event_type,
            format = outcome.format().extension(),
            "certificate generated"
        );

        Ok(GeneratedDocument {
            certificate_id,
            event_id: event.id.clone(),
            request_id: request.id.clone(),
            event_type,
            format: outcome.format(),
            artifact_path: outcome.path().to_path_buf(),
            qr_payload: payload,
            issued_by: user.name.clone(),
            issued_at,
            fallback_reason,
        })
    }

    /// Resolves the record's photo references to inline images. The
    /// request's verification image, when present, takes the primary slot.
    fn embed_photos(
        &self,
        record: &CanonicalCertificateRecord,
        request: &CertificateRequest,
    ) -> BTreeMap<PhotoSlot, Option<EmbeddedImage>> {
        let mut stored: BTreeMap<PhotoSlot, &str> = record.photos().collect();
        let verification = request.verification_image.as_deref();
        if let Some(image) = verification.filter(|s| !s.trim().is_empty()) {
            stored.insert(PhotoSlot::Primary, image);
        }

        let mut out = BTreeMap::new();
        for slot in layout_for(record.event_type()).photos.iter().map(|p| p.slot) {
            let image = stored
                .get(&slot)
                .and_then(|name| self.photos.resolve(name))
                .and_then(|path| embed(&path))
                .and_then(EmbeddedImage::new);
            out.insert(slot, image);
        }
        out
    }

    async fn render_artifact(
        &self,
        dir: &Path,
        certificate_id: &str,
        html: &str,
        record: &CanonicalCertificateRecord,
    ) -> Result<RenderOutcome> {
        std::fs::create_dir_all(dir)?;

        let output = dir.join(format!("{certificate_id}.{}", ArtifactFormat::Pdf.extension()));
        let job = RenderJob {
            html,
            record,
            output: &output,
        };
        match self.engine.render(&job).await {
            Ok(()) => Ok(RenderOutcome::Pdf { path: output }),
            Err(err) => {
                warn!(
                    certificate_id,
                    engine = self.engine.name(),
                    error = %err,
                    "PDF rendering failed, storing HTML"
                );
                let path = storage::write_artifact(
                    dir,
                    certificate_id,
                    ArtifactFormat::Html.extension(),
                    html.as_bytes(),
                )?;
                Ok(RenderOutcome::HtmlFallback {
                    path,
                    reason: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::bilingual::{BilingualResolver, Dictionary, NumeralStyle};
    use crate::error::CertificateError;
    use crate::pdf::{DisabledEngine, RenderError};

    struct FakePdf;

    #[async_trait]
    impl PdfEngine for FakePdf {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn render(&self, job: &RenderJob<'_>) -> std::result::Result<(), RenderError> {
            std::fs::write(job.output, b"%PDF-1.4 fake")?;
            Ok(())
        }
    }

    fn producer(root: &Path, engine: Arc<dyn PdfEngine>) -> DocumentProducer {
        DocumentProducer::new(
            RecordNormalizer::new(BilingualResolver::new(
                Arc::new(Dictionary::builtin()),
                NumeralStyle::Arabic,
            )),
            TemplateStore::new(root.join("templates")),
            PhotoResolver::new(root.join("uploads")),
            engine,
            ProducerSettings {
                certificates_dir: root.join("certificates"),
                assets_base: "/static".into(),
                uploads_base: "/uploads".into(),
                verification_base_url: "https://registry.example".into(),
            },
        )
    }

    fn event(event_type: &str) -> Event {
        serde_json::from_value(json!({
            "id": "ev-1",
            "type": event_type,
            "data": {
                "childNameEn": "Abebe Kebede",
                "sex": "male",
                "childBirthDate": "2014-04-12",
                "childPhoto": "child.png"
            },
            "createdAt": "2024-01-02T10:00:00Z"
        }))
        .unwrap()
    }

    fn request(verification_image: Option<&str>) -> CertificateRequest {
        CertificateRequest {
            id: "req-1".into(),
            requested_by: "user-7".into(),
            verification_image: verification_image.map(String::from),
        }
    }

    fn user() -> RequestingUser {
        RequestingUser {
            id: "clerk-1".into(),
            name: "Almaz Tesfaye".into(),
        }
    }

    #[tokio::test]
    async fn failing_engine_falls_back_to_html() {
        let root = tempfile::tempdir().unwrap();
        let producer = producer(root.path(), Arc::new(DisabledEngine));

        let doc = producer.generate(&event("birth"), &request(None), &user()).await.unwrap();

        assert_eq!(doc.format, ArtifactFormat::Html);
        assert_eq!(
            doc.artifact_path,
            root.path().join("certificates").join(format!("{}.html", doc.certificate_id))
        );
        assert!(doc.fallback_reason.is_some());
        let html = std::fs::read_to_string(&doc.artifact_path).unwrap();
        assert!(html.contains("Abebe Kebede"));
        assert!(html.contains("ወንድ"));
        assert!(html.contains(&doc.certificate_id));
        assert!(html.contains("data:image/svg+xml;base64,"));
        let pdf = format!("{}.pdf", doc.certificate_id);
        assert!(!root.path().join("certificates").join(pdf).exists());
    }

    #[tokio::test]
    async fn working_engine_produces_pdf() {
        let root = tempfile::tempdir().unwrap();
        let producer = producer(root.path(), Arc::new(FakePdf));

        let doc = producer.generate(&event("Birth"), &request(None), &user()).await.unwrap();

        assert_eq!(doc.format, ArtifactFormat::Pdf);
        assert_eq!(doc.artifact_path.extension().unwrap(), "pdf");
        assert_eq!(doc.qr_payload.event_type, EventType::Birth);
        assert_eq!(
            doc.qr_payload.verification_url,
            format!("https://registry.example/verify/{}", doc.certificate_id)
        );
        assert_eq!(doc.issued_by, "Almaz Tesfaye");
    }

    #[tokio::test]
    async fn unsupported_type_is_rejected_before_any_output() {
        let root = tempfile::tempdir().unwrap();
        let producer = producer(root.path(), Arc::new(DisabledEngine));

        let err = producer.generate(&event("adoption"), &request(None), &user()).await.unwrap_err();

        assert!(matches!(err, CertificateError::UnsupportedEventType(t) if t == "adoption"));
        assert!(!root.path().join("certificates").exists());
    }

    #[tokio::test]
    async fn generate_in_writes_only_to_the_given_directory() {
        let root = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let producer = producer(root.path(), Arc::new(DisabledEngine));

        let doc = producer
            .generate_in(scratch.path(), &event("birth"), &request(None), &user())
            .await
            .unwrap();

        assert!(doc.artifact_path.starts_with(scratch.path()));
        assert!(doc.artifact_path.exists());
        assert!(!root.path().join("certificates").exists());
    }

    #[tokio::test]
    async fn each_call_mints_a_new_certificate() {
        let root = tempfile::tempdir().unwrap();
        let producer = producer(root.path(), Arc::new(DisabledEngine));

        let first = producer.generate(&event("birth"), &request(None), &user()).await.unwrap();
        let second = producer.generate(&event("birth"), &request(None), &user()).await.unwrap();

        assert_ne!(first.certificate_id, second.certificate_id);
        assert_ne!(first.artifact_path, second.artifact_path);
    }

    #[tokio::test]
    async fn photos_are_embedded_and_missing_ones_show_placeholder() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("uploads")).unwrap();
        std::fs::write(root.path().join("uploads/1700000000-child.png"), b"\x89PNG").unwrap();
        let producer = producer(root.path(), Arc::new(DisabledEngine));

        let doc = producer.generate(&event("birth"), &request(None), &user()).await.unwrap();
        let html = std::fs::read_to_string(&doc.artifact_path).unwrap();
        assert!(html.contains("data:image/png;base64,"));

        std::fs::remove_file(root.path().join("uploads/1700000000-child.png")).unwrap();
        let doc = producer.generate(&event("birth"), &request(None), &user()).await.unwrap();
        let html = std::fs::read_to_string(&doc.artifact_path).unwrap();
        assert!(!html.contains("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn verification_image_takes_the_primary_slot() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("uploads")).unwrap();
        std::fs::write(root.path().join("uploads/selfie.jpg"), b"\xff\xd8\xff").unwrap();
        let producer = producer(root.path(), Arc::new(DisabledEngine));

        let doc = producer
            .generate(&event("birth"), &request(Some("/uploads/selfie.jpg")), &user())
            .await
            .unwrap();
        let html = std::fs::read_to_string(&doc.artifact_path).unwrap();
        assert!(html.contains("data:image/jpeg;base64,"));
    }
}
