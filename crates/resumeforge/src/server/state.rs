//! Shared state handed to every request handler.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::export::{CommandExporter, DocumentExporter};
use crate::render::{render, PhotoSource, TemplateName};
use crate::resume::Resume;
use crate::storage::ResumeStore;
use crate::uploads::UploadStore;

/// Application state, constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Resume database.
    pub store: Arc<ResumeStore>,
    /// Photo and document directories.
    pub uploads: UploadStore,
    /// HTML-to-document converter.
    pub exporter: Arc<dyn DocumentExporter>,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Assemble state from explicit parts.
    #[must_use]
    pub fn new(
        store: ResumeStore,
        uploads: UploadStore,
        exporter: Arc<dyn DocumentExporter>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            store: Arc::new(store),
            uploads,
            exporter,
            max_body_bytes,
        }
    }

    /// Open the store and directories named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or the database
    /// cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let uploads = UploadStore::new(config.uploads_dir(), config.generated_dir());
        uploads.ensure_dirs()?;

        let store = ResumeStore::open(config.database_path())?;
        let exporter = CommandExporter::new(config.generated_dir(), &config.export);

        Ok(Self::new(
            store,
            uploads,
            Arc::new(exporter),
            config.server.max_body_bytes,
        ))
    }

    /// Render `resume` with its photo embedded and export it as a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the photo cannot be read, the template fails, or
    /// the converter fails.
    pub async fn generate_document(&self, resume: &Resume) -> Result<PathBuf> {
        let photo = PhotoSource::embedded(resume, &self.uploads).await?;
        let markup = render(TemplateName::Resume, Some(resume), &photo)?;
        self.exporter.export(&markup, resume.id).await
    }
}
