// In-process PDF via genpdf.
// Lays out the canonical record as labelled lines; the HTML template is not
// interpreted. Needs TTF fonts with Ethiopic glyphs for the Amharic side.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::Element;
use tracing::info;

use super::{PdfEngine, RenderError, RenderJob};
use crate::normalize::{layout_for, CanonicalCertificateRecord};

const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/noto",
    "/usr/share/fonts/truetype/abyssinica",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/Library/Fonts",
];

const FONT_NAMES: &[&str] = &["NotoSansEthiopic", "AbyssinicaSIL", "LiberationSans", "DejaVuSans"];

#[derive(Debug, Clone, Default)]
pub struct NativeEngine {
    font_dir: Option<PathBuf>,
}

impl NativeEngine {
    pub fn new(font_dir: Option<PathBuf>) -> Self {
        Self { font_dir }
    }

    fn font_family(&self) -> Result<FontFamily<FontData>, RenderError> {
        let configured = self.font_dir.iter().map(PathBuf::as_path);
        configured
            .chain(FONT_DIRS.iter().map(Path::new))
            .filter(|dir| dir.exists())
            .find_map(|dir| {
                FONT_NAMES
                    .iter()
                    .find_map(|name| genpdf::fonts::from_files(dir, name, None).ok())
            })
            .ok_or_else(|| RenderError::Unavailable("no usable TTF font family found".to_string()))
    }
}

/// `childBirthPlace` → `Child Birth Place`.
fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Label/value lines in layout order, skipping empty fields.
fn lines(record: &CanonicalCertificateRecord) -> Vec<(String, String)> {
    let layout = layout_for(record.event_type());
    let mut out = Vec::new();

    let text_keys = layout
        .names
        .iter()
        .map(|f| f.key)
        .chain(layout.texts.iter().map(|f| f.key))
        .chain(layout.numbers.iter().map(|f| f.key))
        .chain(layout.addresses.iter().map(|f| f.key));
    for key in text_keys {
        if let Some(text) = record.text(key).filter(|t| !t.is_empty()) {
            let value = match (text.en.is_empty(), text.am.is_empty()) {
                (false, false) if text.en != text.am => format!("{} / {}", text.en, text.am),
                (false, _) => text.en.clone(),
                (true, _) => text.am.clone(),
            };
            out.push((humanize(key), value));
        }
    }

    for field in layout.dates {
        if let Some(date) = record.date(field.key) {
            out.push((
                humanize(field.key),
                format!("{} E.C. / {} G.C.", date.ec_numeric(), date.gc_numeric()),
            ));
        }
    }
    out
}

#[async_trait]
impl PdfEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError> {
        let fonts = self.font_family()?;
        let title = job.record.title().clone();
        let identifier = |key: &str| job.record.identifier(key).unwrap_or_default().to_string();
        let certificate_id = identifier("certificateId");
        let registration = identifier("registrationNumber");
        let issued = job.record.date("issuedDate").map(|d| d.gc_long_en()).unwrap_or_default();
        let body = lines(job.record);
        let output = job.output.to_path_buf();

        let rendered = tokio::task::spawn_blocking(move || {
            let mut doc = genpdf::Document::new(fonts);
            doc.set_title(title.en.as_str());

            let mut decorator = genpdf::SimplePageDecorator::new();
            decorator.set_margins(10);
            doc.set_page_decorator(decorator);

            let heading = Style::new().bold().with_font_size(22);
            doc.push(Paragraph::new(title.en.as_str()).styled(heading));
            doc.push(Paragraph::new(title.am.as_str()).styled(Style::new().with_font_size(18)));
            doc.push(Break::new(1.0));

            for (label, value) in body {
                doc.push(Paragraph::new(format!("{label}: {value}")));
            }

            doc.push(Break::new(1.0));
            if !registration.is_empty() {
                doc.push(Paragraph::new(format!("Registration No.: {registration}")));
            }
            doc.push(Paragraph::new(format!("Certificate ID: {certificate_id}")));
            doc.push(Paragraph::new(format!("Issued: {issued}")));

            doc.render_to_file(&output).map_err(|e| RenderError::Layout(e.to_string()))
        })
        .await
        .map_err(|e| RenderError::Layout(format!("render task failed: {e}")))?;

        if let Err(err) = rendered {
            let _ = std::fs::remove_file(job.output);
            return Err(err);
        }
        info!(output = %job.output.display(), "rendered certificate with genpdf");
        Ok(())
    }
}
