// Certificate PDF rendering.
// Engines are tried once per certificate; any failure falls back to the
// rendered HTML being stored as the artifact.
mod chromium;
mod native;

pub use chromium::ChromiumEngine;
pub use native::NativeEngine;

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::CanonicalCertificateRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Pdf,
    Html,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Html => "text/html; charset=utf-8",
        }
    }
}

impl std::str::FromStr for ArtifactFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown artifact format '{other}'")),
        }
    }
}

/// How the certificate ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Pdf { path: PathBuf },
    /// The PDF engine failed; the rendered markup was stored instead.
    HtmlFallback { path: PathBuf, reason: String },
}

impl RenderOutcome {
    pub fn format(&self) -> ArtifactFormat {
        match self {
            Self::Pdf { .. } => ArtifactFormat::Pdf,
            Self::HtmlFallback { .. } => ArtifactFormat::Html,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Pdf { path } | Self::HtmlFallback { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF engine unavailable: {0}")]
    Unavailable(String),
    #[error("failed to spawn renderer: {0}")]
    SpawnFailed(#[source] std::io::Error),
    #[error("renderer timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("renderer exited with {status}: {stderr}")]
    ProcessFailed { status: ExitStatus, stderr: String },
    #[error("renderer produced no output at {0}")]
    EmptyOutput(PathBuf),
    #[error("PDF layout failed: {0}")]
    Layout(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything an engine may use to produce one PDF.
pub struct RenderJob<'a> {
    pub html: &'a str,
    pub record: &'a CanonicalCertificateRecord,
    pub output: &'a Path,
}

#[async_trait]
pub trait PdfEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Writes a PDF to `job.output` or fails without leaving one behind.
    async fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError>;
}

/// For deployments that only store HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEngine;

#[async_trait]
impl PdfEngine for DisabledEngine {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn render(&self, _job: &RenderJob<'_>) -> Result<(), RenderError> {
        Err(RenderError::Unavailable("PDF rendering is disabled".to_string()))
    }
}
