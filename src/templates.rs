use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::Engine;
use regex::{Captures, Regex};
use tera::Tera;

use crate::bilingual::BilingualText;
use crate::error::{CertificateError, Result};
use crate::event::EventType;
use crate::normalize::{CanonicalCertificateRecord, PhotoSlot};

/// Service pages (index, verification). Certificate bodies go through
/// [`TemplateRenderer`] instead.
///
/// Files in `template_dir` override the bundled pages; unreadable or invalid
/// files fall back to the built-ins.
pub fn load_pages(template_dir: &Path) -> Tera {
    let mut tera = Tera::default();
    let pages = [
        ("index.html", include_str!("../templates/index.html")),
        ("verify.html", include_str!("../templates/verify.html")),
    ];
    for (name, builtin) in pages {
        let source = std::fs::read_to_string(template_dir.join(name))
            .unwrap_or_else(|_| builtin.to_string());
        if let Err(err) = tera.add_raw_template(name, &source) {
            tracing::error!(template = name, error = %err, "invalid page template, using built-in");
            if let Err(err) = tera.add_raw_template(name, builtin) {
                tracing::error!(template = name, error = %err, "built-in page template rejected");
            }
        }
    }
    tera
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// The bundled emblem, inlined so certificates render without network or
/// filesystem access to static assets.
pub fn emblem() -> &'static EmbeddedImage {
    static EMBLEM: OnceLock<EmbeddedImage> = OnceLock::new();
    EMBLEM.get_or_init(|| {
        let svg = include_str!("../static/img/emblem.svg");
        EmbeddedImage(format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(svg)
        ))
    })
}

/// A certificate body for one event type, read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub source: String,
}

/// Loads `<dir>/certificates/<type>.html`, falling back to the bundled
/// layout when the deployment does not ship its own.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self, event_type: EventType) -> Result<Template> {
        let name = format!("{}.html", event_type.as_str());
        let path = self.dir.join("certificates").join(&name);
        match std::fs::read_to_string(&path) {
            Ok(source) => Ok(Template { name, source }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no custom template, using built-in");
                Ok(Template {
                    name,
                    source: builtin_template(event_type).to_string(),
                })
            }
            Err(err) => Err(CertificateError::Template(format!("{}: {}", path.display(), err))),
        }
    }
}

pub fn builtin_template(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Birth => include_str!("../templates/certificates/birth.html"),
        EventType::Marriage => include_str!("../templates/certificates/marriage.html"),
        EventType::Death => include_str!("../templates/certificates/death.html"),
        EventType::Divorce => include_str!("../templates/certificates/divorce.html"),
    }
}

/// A `data:` URI. Photo tokens only accept this, never a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage(String);

impl EmbeddedImage {
    /// `None` unless `uri` is a `data:` URI.
    pub fn new(uri: impl Into<String>) -> Option<Self> {
        let uri = uri.into();
        uri.starts_with("data:").then_some(Self(uri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Values the renderer substitutes ahead of record fields.
#[derive(Debug, Clone, Default)]
pub struct SpecialTokens {
    pub qr_code: Option<EmbeddedImage>,
    pub assets_base: String,
    pub uploads_base: String,
    pub certificate_type: BilingualText,
    pub photos: BTreeMap<PhotoSlot, Option<EmbeddedImage>>,
}

impl SpecialTokens {
    fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(
            "qrCode".to_string(),
            self.qr_code.as_ref().map(|q| q.as_str().to_string()).unwrap_or_default(),
        );
        map.insert("emblem".to_string(), emblem().as_str().to_string());
        map.insert("assetsBase".to_string(), self.assets_base.clone());
        map.insert("uploadsBase".to_string(), self.uploads_base.clone());
        map.insert("certificateType".to_string(), self.certificate_type.en.clone());
        map.insert("certificateTypeEn".to_string(), self.certificate_type.en.clone());
        map.insert("certificateTypeAm".to_string(), self.certificate_type.am.clone());

        for slot in [PhotoSlot::Primary, PhotoSlot::Secondary] {
            let token = slot.token();
            let image = self.photos.get(&slot).and_then(Option::as_ref);
            let (shown, placeholder) = if image.is_some() {
                ("block", "none")
            } else {
                ("none", "flex")
            };
            map.insert(
                token.to_string(),
                image.map(|i| i.as_str().to_string()).unwrap_or_default(),
            );
            map.insert(format!("{token}Display"), shown.to_string());
            map.insert(format!("{token}PlaceholderDisplay"), placeholder.to_string());
        }
        map
    }
}

/// `{{identifier}}` substitution over a canonical record.
///
/// Special tokens take precedence over record fields; unknown identifiers
/// render as nothing. Values are HTML-escaped. No I/O happens here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn render(
        &self,
        template: &Template,
        record: &CanonicalCertificateRecord,
        tokens: &SpecialTokens,
    ) -> String {
        let specials = tokens.to_map();
        let fields = record.flatten();
        placeholder()
            .replace_all(&template.source, |caps: &Captures| {
                let key = &caps[1];
                specials
                    .get(key)
                    .or_else(|| fields.get(key))
                    .map(|value| escape_html(value))
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::json;

    use crate::bilingual::{BilingualResolver, Dictionary, NumeralStyle};
    use crate::normalize::{IssueContext, RecordNormalizer};

    fn record() -> CanonicalCertificateRecord {
        let normalizer = RecordNormalizer::new(BilingualResolver::new(
            Arc::new(Dictionary::builtin()),
            NumeralStyle::Arabic,
        ));
        let source = json!({
            "childNameEn": "Abebe <Kebede>",
            "sex": "female",
            "childBirthDate": "2014-04-12"
        });
        normalizer.normalize(
            source.as_object().unwrap(),
            EventType::Birth,
            &IssueContext {
                certificate_id: "CERT-1".into(),
                event_id: "ev-1".into(),
                request_id: "req-1".into(),
                issued_by: "Registrar".into(),
                issued_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                registered_on: None,
            },
        )
    }

    fn template(source: &str) -> Template {
        Template {
            name: "t".into(),
            source: source.into(),
        }
    }

    #[test]
    fn substitutes_record_fields_and_escapes() {
        let out = TemplateRenderer.render(
            &template("{{childName}}|{{ childSexAm }}|{{childBirthDateGc}}"),
            &record(),
            &SpecialTokens::default(),
        );
        assert_eq!(out, "Abebe &lt;Kebede&gt;|ሴት|21/12/2021");
    }

    #[test]
    fn unknown_identifiers_render_empty() {
        let out = TemplateRenderer.render(
            &template("[{{nope}}][{{ }}]"),
            &record(),
            &SpecialTokens::default(),
        );
        assert_eq!(out, "[][{{ }}]");
    }

    #[test]
    fn special_tokens_shadow_record_fields() {
        let tokens = SpecialTokens {
            assets_base: "/static".into(),
            certificate_type: BilingualText::new("Birth Certificate", "የልደት ምስክር ወረቀት"),
            ..Default::default()
        };
        let out = TemplateRenderer.render(
            &template("{{assetsBase}}/logo.png {{certificateTypeAm}} {{eventType}}"),
            &record(),
            &tokens,
        );
        assert_eq!(out, "/static/logo.png የልደት ምስክር ወረቀት birth");
    }

    #[test]
    fn missing_photo_renders_placeholder_toggles() {
        let mut tokens = SpecialTokens::default();
        tokens.photos.insert(PhotoSlot::Primary, None);
        let out = TemplateRenderer.render(
            &template(concat!(
                "<img src=\"{{photoPrimary}}\" style=\"display:{{photoPrimaryDisplay}}\">",
                "<div style=\"display:{{photoPrimaryPlaceholderDisplay}}\">",
            )),
            &record(),
            &tokens,
        );
        assert_eq!(out, "<img src=\"\" style=\"display:none\"><div style=\"display:flex\">");
    }

    #[test]
    fn embedded_photo_is_shown() {
        let mut tokens = SpecialTokens::default();
        tokens
            .photos
            .insert(PhotoSlot::Secondary, EmbeddedImage::new("data:image/png;base64,aW1n"));
        let out = TemplateRenderer.render(
            &template("{{photoSecondary}} {{photoSecondaryDisplay}}"),
            &record(),
            &tokens,
        );
        assert_eq!(out, "data:image/png;base64,aW1n block");
        assert!(EmbeddedImage::new("/srv/uploads/a.png").is_none());
    }

    #[test]
    fn rendering_is_idempotent() {
        let record = record();
        let tokens = SpecialTokens::default();
        for event_type in EventType::ALL {
            let tpl = Template {
                name: event_type.as_str().into(),
                source: builtin_template(event_type).into(),
            };
            let first = TemplateRenderer.render(&tpl, &record, &tokens);
            let second = TemplateRenderer.render(&tpl, &record, &tokens);
            assert_eq!(first, second);
            assert!(!first.contains("{{"));
        }
    }

    #[test]
    fn store_prefers_custom_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("certificates")).unwrap();
        let custom = dir.path().join("certificates/death.html");
        std::fs::write(custom, "custom {{deceasedName}}").unwrap();
        let store = TemplateStore::new(dir.path());
        assert_eq!(store.load(EventType::Death).unwrap().source, "custom {{deceasedName}}");
        assert_eq!(
            store.load(EventType::Birth).unwrap().source,
            builtin_template(EventType::Birth)
        );
    }

    #[test]
    fn builtin_certificates_inline_the_emblem() {
        let tokens = SpecialTokens {
            assets_base: "/static".into(),
            ..Default::default()
        };
        for event_type in EventType::ALL {
            let tpl = Template {
                name: event_type.as_str().into(),
                source: builtin_template(event_type).into(),
            };
            let out = TemplateRenderer.render(&tpl, &record(), &tokens);
            assert!(out.contains(&format!("class=\"emblem\" src=\"{}\"", emblem().as_str())));
            assert!(!out.contains("img/emblem.png"), "{event_type} links an external emblem");
        }
        assert!(emblem().as_str().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn pages_load_from_each_directory() {
        let custom = tempfile::tempdir().unwrap();
        std::fs::write(custom.path().join("index.html"), "custom index {{ pdf_engine }}").unwrap();
        let plain = tempfile::tempdir().unwrap();

        let mut ctx = tera::Context::new();
        ctx.insert("pdf_engine", "none");
        ctx.insert("event_types", &["birth"]);

        let custom_pages = load_pages(custom.path());
        assert_eq!(custom_pages.render("index.html", &ctx).unwrap(), "custom index none");
        // A second directory gets its own pages, not the first one's.
        let plain_pages = load_pages(plain.path());
        assert!(!plain_pages.render("index.html", &ctx).unwrap().starts_with("custom index"));
    }

    #[test]
    fn invalid_page_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("verify.html"), "{% if %}").unwrap();
        let pages = load_pages(dir.path());
        assert!(pages.get_template_names().any(|name| name == "verify.html"));
    }
}
