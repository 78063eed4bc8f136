//! Conversion of rendered markup into PDF documents.
//!
//! Documents are written to `{generated_dir}/resume_{id}.pdf`, replacing any
//! earlier export of the same resume.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{ExportConfig, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
use crate::error::{Error, Result};

/// File extension of generated documents.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// MIME type of generated documents.
pub const DOCUMENT_CONTENT_TYPE: &str = "application/pdf";

/// File name of the generated document for a resume.
#[must_use]
pub fn document_file_name(id: i64) -> String {
    format!("resume_{id}.{DOCUMENT_EXTENSION}")
}

/// Turns rendered HTML into a paginated document on disk.
#[async_trait]
pub trait DocumentExporter: Send + Sync + std::fmt::Debug {
    /// Export `markup` for resume `id` and return the document path.
    async fn export(&self, markup: &str, id: i64) -> Result<PathBuf>;
}

/// Exporter that runs an external HTML-to-PDF converter.
///
/// The markup is written to `resume_{id}.html` beside the output and the
/// configured program is run with `{input}`/`{output}` substituted.
#[derive(Debug, Clone)]
pub struct CommandExporter {
    output_dir: PathBuf,
    program: String,
    args: Vec<String>,
}

impl CommandExporter {
    /// Create an exporter writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, config: &ExportConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    /// Deterministic output path for resume `id`.
    #[must_use]
    pub fn output_path(&self, id: i64) -> PathBuf {
        self.output_dir.join(document_file_name(id))
    }

    fn markup_path(&self, id: i64) -> PathBuf {
        self.output_dir.join(format!("resume_{id}.html"))
    }

    fn command_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

#[async_trait]
impl DocumentExporter for CommandExporter {
    async fn export(&self, markup: &str, id: i64) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: self.output_dir.clone(),
                source,
            })?;

        let input = self.markup_path(id);
        let output = self.output_path(id);
        tokio::fs::write(&input, markup).await?;

        // A stale document must not survive a failed conversion.
        match tokio::fs::remove_file(&output).await {
            Ok(()) => debug!(path = %output.display(), "Replacing existing document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let args = self.command_args(&input, &output);
        debug!(program = %self.program, ?args, "Running document converter");

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::render(format!("failed to run {}: {e}", self.program)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::render(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
            return Err(Error::render(format!(
                "{} did not produce {}",
                self.program,
                output.display()
            )));
        }

        info!(resume_id = id, path = %output.display(), "Exported resume document");
        Ok(output)
    }
}
