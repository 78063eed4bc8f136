//! `resumeforge` - collect resumes through a web form and render them to PDF.
//!
//! Submissions are stored in a single `SQLite` table, rendered through fixed
//! HTML templates, and converted to PDF by an external converter.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod render;
pub mod resume;
pub mod server;
pub mod storage;
pub mod uploads;

pub use config::Config;
pub use error::{Error, Result};
pub use export::{CommandExporter, DocumentExporter};
pub use logging::init_logging;
pub use render::PhotoSource;
pub use resume::{NewResume, Resume, ResumeSummary};
pub use server::AppState;
pub use storage::ResumeStore;
pub use uploads::UploadStore;
