//! HTTP request handlers.
//!
//! Every handler is a single request/response; nothing is kept between
//! requests apart from the store and the file directories.

use std::path::Path;

use axum::extract::{FromRequestParts, Multipart, Path as UrlPath, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::response::{Html, IntoResponse, Response};
use chrono::Local;
use tracing::{debug, info};

use super::state::AppState;
use crate::error::{Error, Result};
use crate::export::{document_file_name, DOCUMENT_CONTENT_TYPE};
use crate::render::{render, PhotoSource, TemplateName};
use crate::resume::{NewResume, Resume, DEFAULT_DECLARATION};

/// A photo received with a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    /// File name as sent by the client.
    pub file_name: String,
    /// File contents.
    pub data: Vec<u8>,
}

/// A parsed form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Text fields. `date` and `photo` are filled in later.
    pub fields: NewResume,
    /// Attached photo, if any.
    pub photo: Option<UploadedPhoto>,
}

/// Resume id taken from the URL path.
///
/// A segment that is not an integer is answered like an unknown id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for ResumeId {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        UrlPath::<i64>::from_request_parts(parts, state)
            .await
            .map(|UrlPath(id)| Self(id))
            .map_err(|rejection| Error::InvalidId(rejection.body_text()))
    }
}

/// `GET /` - the blank form.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub async fn form() -> Result<Html<String>> {
    Ok(Html(render(TemplateName::Form, None, &PhotoSource::None)?))
}

/// `POST /` - store a submission and return its document.
///
/// # Errors
///
/// Returns an error if the form is malformed, or if storage or export fails.
pub async fn submit(State(state): State<AppState>, multipart: Multipart) -> Result<Response> {
    let submission = parse_submission(multipart).await?;
    let now = Local::now();

    let mut fields = submission.fields;
    if let Some(photo) = submission.photo {
        fields.photo = state
            .uploads
            .save_photo(&photo.file_name, &photo.data, now)
            .await?;
    }
    fields.stamp_date(now);

    let id = state.store.save(&fields)?;
    info!(resume_id = id, has_photo = fields.has_photo(), "Stored resume");

    let resume = Resume { id, fields };
    let path = state.generate_document(&resume).await?;
    attachment(&path, id).await
}

/// `GET /view/{id}` - render a resume for the browser.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id.
pub async fn view(
    State(state): State<AppState>,
    ResumeId(id): ResumeId,
) -> Result<Html<String>> {
    let resume = state.store.get(id)?.ok_or(Error::NotFound { id })?;
    let photo = PhotoSource::linked(&resume);
    Ok(Html(render(TemplateName::Resume, Some(&resume), &photo)?))
}

/// `GET /download/{id}` - regenerate and return a resume's document.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id.
pub async fn download(
    State(state): State<AppState>,
    ResumeId(id): ResumeId,
) -> Result<Response> {
    let resume = state.store.get(id)?.ok_or(Error::NotFound { id })?;
    let path = state.generate_document(&resume).await?;
    attachment(&path, id).await
}

/// `GET /debug/{id}` - render a resume without an existence guard.
///
/// An unknown id is a server fault here, not a 404.
///
/// # Errors
///
/// Returns [`Error::RecordMissing`] for an unknown id.
pub async fn debug_view(
    State(state): State<AppState>,
    ResumeId(id): ResumeId,
) -> Result<Html<String>> {
    let resume = state.store.get(id)?.ok_or(Error::RecordMissing { id })?;
    let photo = PhotoSource::linked(&resume);
    Ok(Html(render(TemplateName::Resume, Some(&resume), &photo)?))
}

/// `GET /healthz` - liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Read a multipart form into a [`Submission`].
///
/// Repeated `skills`, `languages` and `hobbies` fields keep their order;
/// blank entries are dropped. A `photo` part without a file name is ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidForm`] if the body is not valid multipart data.
pub async fn parse_submission(mut multipart: Multipart) -> Result<Submission> {
    let mut submission = Submission::default();
    let mut declaration = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidForm(format!("failed to read multipart: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "photo" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::InvalidForm(format!("failed to read photo: {e}")))?;
            if !file_name.is_empty() {
                submission.photo = Some(UploadedPhoto {
                    file_name,
                    data: data.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| Error::InvalidForm(format!("failed to read field {name}: {e}")))?;

        let fields = &mut submission.fields;
        match name.as_str() {
            "name" => fields.name = value,
            "email" => fields.email = value,
            "phone" => fields.phone = value,
            "dob" => fields.dob = value,
            "address" => fields.address = value,
            "nationality" => fields.nationality = value,
            "linkedin" => fields.linkedin = value,
            "objective" => fields.objective = value,
            "experience" => fields.experience = value,
            "education" => fields.education = value,
            "declaration" => declaration = Some(value),
            "skills" => push_item(&mut fields.skills, value),
            "languages" => push_item(&mut fields.languages, value),
            "hobbies" => push_item(&mut fields.hobbies, value),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    submission.fields.declaration = declaration.unwrap_or_else(|| DEFAULT_DECLARATION.to_string());
    Ok(submission)
}

fn push_item(items: &mut Vec<String>, value: String) {
    if !value.trim().is_empty() {
        items.push(value);
    }
}

async fn attachment(path: &Path, id: i64) -> Result<Response> {
    let bytes = tokio::fs::read(path).await?;
    let headers = [
        (header::CONTENT_TYPE, DOCUMENT_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document_file_name(id)),
        ),
    ];
    Ok((headers, bytes).into_response())
}
