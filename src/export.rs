//! Document export: turns the rendered HTML report into an opaque document.
//!
//! [`DocumentExporter`] is the seam; [`WkhtmltopdfExporter`] pipes the HTML
//! through the `wkhtmltopdf` binary.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{ReportError, Result};

/// Converts an HTML document into bytes of some document format.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(&self, html: &str) -> Result<Vec<u8>>;
}

pub struct WkhtmltopdfExporter {
    pub binary: PathBuf,
    pub timeout: Duration,
}

impl WkhtmltopdfExporter {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Uses `WKHTMLTOPDF_PATH` if set, otherwise `wkhtmltopdf` from `PATH`.
    pub fn from_env() -> Self {
        let binary = std::env::var("WKHTMLTOPDF_PATH").unwrap_or_else(|_| "wkhtmltopdf".to_string());
        Self::new(binary)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the binary to an existing file, searching `PATH` for bare names.
    pub fn locate(&self) -> Option<PathBuf> {
        if self.binary.components().count() > 1 {
            return self.binary.is_file().then(|| self.binary.clone());
        }
        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path)
            .map(|dir| dir.join(&self.binary))
            .find(|candidate| candidate.is_file())
    }
}

#[async_trait]
impl DocumentExporter for WkhtmltopdfExporter {
    #[tracing::instrument(skip_all, fields(html_bytes = html.len()))]
    async fn export(&self, html: &str) -> Result<Vec<u8>> {
        debug!(binary = %self.binary.display(), "Starting renderer");
        let mut child = Command::new(&self.binary)
            .args(["--quiet", "--encoding", "utf-8", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ReportError::ExportFailed(format!("cannot start {}: {e}", self.binary.display()))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReportError::ExportFailed("renderer stdin unavailable".into()))?;
        let input = html.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            let written = stdin.write_all(&input).await;
            drop(stdin);
            written
        });

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ReportError::ExportFailed(format!("renderer timed out after {:?}", self.timeout))
            })?
            .map_err(|e| ReportError::ExportFailed(format!("renderer failed: {e}")))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "Renderer closed stdin early"),
            Err(e) => debug!(error = %e, "Stdin writer task failed"),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReportError::ExportFailed(format!(
                "renderer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(ReportError::ExportFailed("renderer produced no output".into()));
        }

        info!(pdf_bytes = output.stdout.len(), "Document exported");
        Ok(output.stdout)
    }
}
