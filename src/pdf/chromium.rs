//! Headless Chromium `--print-to-pdf`.

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{PdfEngine, RenderError, RenderJob};

const BROWSER_NAMES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

#[derive(Debug, Clone)]
pub struct ChromiumEngine {
    binary_path: Option<PathBuf>,
    timeout: Duration,
}

impl ChromiumEngine {
    /// `binary_path` of `None` searches `PATH` at render time.
    pub fn new(binary_path: Option<PathBuf>, timeout: Duration) -> Self {
        Self { binary_path, timeout }
    }

    fn binary(&self) -> Result<PathBuf, RenderError> {
        if let Some(path) = &self.binary_path {
            return if path.exists() {
                Ok(path.clone())
            } else {
                Err(RenderError::Unavailable(format!("{} does not exist", path.display())))
            };
        }
        BROWSER_NAMES
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| RenderError::Unavailable("no Chromium binary on PATH".to_string()))
    }
}

#[async_trait]
impl PdfEngine for ChromiumEngine {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError> {
        let binary = self.binary()?;

        // The browser reads the markup from disk; photos and the QR code are
        // already inlined as data URIs.
        let mut page = tempfile::Builder::new()
            .prefix("certificate-")
            .suffix(".html")
            .tempfile()?;
        page.write_all(job.html.as_bytes())?;
        page.flush()?;

        let mut cmd = Command::new(&binary);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", job.output.display()))
            .arg(format!("file://{}", page.path().display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            binary = %binary.display(),
            output = %job.output.display(),
            "starting headless Chromium"
        );
        let mut child = cmd.spawn().map_err(RenderError::SpawnFailed)?;

        let result = timeout(self.timeout, async {
            let mut stderr = String::new();
            if let Some(mut handle) = child.stderr.take() {
                handle.read_to_string(&mut stderr).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stderr))
        })
        .await;

        let outcome = match result {
            Ok(Ok((status, _))) if status.success() => match std::fs::metadata(job.output) {
                Ok(meta) if meta.len() > 0 => Ok(()),
                _ => Err(RenderError::EmptyOutput(job.output.to_path_buf())),
            },
            Ok(Ok((status, stderr))) => Err(RenderError::ProcessFailed { status, stderr }),
            Ok(Err(err)) => Err(RenderError::Io(err)),
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Chromium timed out");
                let _ = child.kill().await;
                Err(RenderError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        match &outcome {
            Ok(()) => info!(output = %job.output.display(), "Chromium rendered certificate"),
            Err(_) => {
                let _ = std::fs::remove_file(job.output);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configured_binary_is_unavailable() {
        let engine = ChromiumEngine::new(
            Some(PathBuf::from("/nonexistent/chromium")),
            Duration::from_secs(1),
        );
        assert!(matches!(engine.binary(), Err(RenderError::Unavailable(_))));
    }
}
