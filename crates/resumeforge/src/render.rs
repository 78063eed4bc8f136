//! HTML rendering of the submission form and of stored resumes.
//!
//! Templates live in `templates/` and are compiled in by askama, which
//! HTML-escapes every substituted value.

use askama::Template;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::Result;
use crate::resume::{NewResume, Resume};
use crate::uploads::{UploadStore, UPLOADS_URL_PREFIX};

/// The fixed templates this service renders.
///
/// `Form` is `templates/resume_form.html`, `Resume` is `templates/resume.html`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    /// The blank submission form.
    Form,
    /// A filled-in resume.
    Resume,
}

/// How a resume photo is referenced from rendered markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhotoSource {
    /// No photo.
    #[default]
    None,
    /// Self-contained `data:` URI, for generated documents.
    Embedded {
        /// The full data URI.
        data_uri: String,
    },
    /// Server-relative URL, for pages viewed in a browser.
    Linked {
        /// URL path of the uploaded photo.
        url: String,
    },
}

impl PhotoSource {
    /// Link to the uploaded photo of `resume`, if it has one.
    #[must_use]
    pub fn linked(resume: &Resume) -> Self {
        if resume.has_photo() {
            Self::Linked {
                url: format!("{UPLOADS_URL_PREFIX}/{}", resume.fields.photo),
            }
        } else {
            Self::None
        }
    }

    /// Embed the uploaded photo of `resume`, if it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the photo file cannot be read.
    pub async fn embedded(resume: &Resume, uploads: &UploadStore) -> Result<Self> {
        if !resume.has_photo() {
            return Ok(Self::None);
        }
        let bytes = uploads.read_photo(&resume.fields.photo).await?;
        Ok(Self::Embedded {
            data_uri: data_uri(&resume.fields.photo, &bytes),
        })
    }

    /// Value for the `src` attribute, empty when there is no photo.
    #[must_use]
    pub fn src(&self) -> &str {
        match self {
            Self::None => "",
            Self::Embedded { data_uri } => data_uri,
            Self::Linked { url } => url,
        }
    }
}

/// Guess an image MIME type from a file name, defaulting to JPEG.
#[must_use]
pub fn image_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Build a base64 `data:` URI for image bytes.
#[must_use]
pub fn data_uri(name: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", image_mime(name), STANDARD.encode(bytes))
}

#[derive(Template)]
#[template(path = "resume_form.html")]
struct FormTemplate;

#[derive(Template)]
#[template(path = "resume.html")]
struct ResumeTemplate<'a> {
    resume: &'a NewResume,
    photo_src: &'a str,
}

/// Render the blank submission form.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_form() -> Result<String> {
    Ok(FormTemplate.render()?)
}

/// Render a stored resume.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_resume(resume: &Resume, photo: &PhotoSource) -> Result<String> {
    render_fields(&resume.fields, photo)
}

/// Render a named template. A missing resume renders with every field empty.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render(name: TemplateName, resume: Option<&Resume>, photo: &PhotoSource) -> Result<String> {
    match name {
        TemplateName::Form => render_form(),
        TemplateName::Resume => match resume {
            Some(resume) => render_resume(resume, photo),
            None => render_fields(&NewResume::default(), photo),
        },
    }
}

fn render_fields(fields: &NewResume, photo: &PhotoSource) -> Result<String> {
    let template = ResumeTemplate {
        resume: fields,
        photo_src: photo.src(),
    };
    Ok(template.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resume() -> Resume {
        Resume {
            id: 1,
            fields: NewResume {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                skills: vec!["math".to_string(), "logic".to_string()],
                languages: vec!["English".to_string(), "French".to_string()],
                declaration: "All true.".to_string(),
                date: "10/12/1843".to_string(),
                ..NewResume::default()
            },
        }
    }

    #[test]
    fn test_render_form_has_inputs() {
        let html = render_form().unwrap();
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"name\""));
        assert!(html.contains("name=\"skills\""));
        assert!(html.contains("name=\"photo\""));
    }

    #[test]
    fn test_render_resume_substitutes_fields() {
        let html = render_resume(&sample_resume(), &PhotoSource::None).unwrap();
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("ada@example.com"));
        assert!(html.contains("<li>math</li>"));
        assert!(html.contains("<li>logic</li>"));
        assert!(html.contains("French"));
        assert!(html.contains("1843"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let mut resume = sample_resume();
        resume.fields.name = "<script>alert(1)</script>".to_string();

        let html = render_resume(&resume, &PhotoSource::None).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_linked_photo() {
        let mut resume = sample_resume();
        resume.fields.photo = "20240101000000_me.jpg".to_string();

        let photo = PhotoSource::linked(&resume);
        assert_eq!(photo.src(), "/static/uploads/20240101000000_me.jpg");

        let html = render_resume(&resume, &photo).unwrap();
        assert!(html.contains("/static/uploads/20240101000000_me.jpg"));
    }

    #[test]
    fn test_linked_without_photo_is_none() {
        assert_eq!(PhotoSource::linked(&sample_resume()), PhotoSource::None);
    }

    #[tokio::test]
    async fn test_embedded_photo_reads_upload() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::new(dir.path(), dir.path());
        std::fs::write(dir.path().join("me.png"), b"png").unwrap();

        let mut resume = sample_resume();
        resume.fields.photo = "me.png".to_string();

        let photo = PhotoSource::embedded(&resume, &uploads).await.unwrap();
        assert_eq!(photo.src(), "data:image/png;base64,cG5n");

        let html = render_resume(&resume, &photo).unwrap();
        assert!(html.contains("data:image/png;base64,cG5n"));
    }

    #[tokio::test]
    async fn test_embedded_missing_photo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::new(dir.path(), dir.path());

        let mut resume = sample_resume();
        resume.fields.photo = "gone.jpg".to_string();

        let err = PhotoSource::embedded(&resume, &uploads).await.unwrap_err();
        assert!(err.is_render_error());
    }

    #[test]
    fn test_render_by_name_matches_direct_render() {
        let resume = sample_resume();
        let photo = PhotoSource::linked(&resume);
        assert_eq!(
            render(TemplateName::Resume, Some(&resume), &photo).unwrap(),
            render_resume(&resume, &photo).unwrap()
        );
        assert_eq!(
            render(TemplateName::Form, Some(&resume), &photo).unwrap(),
            render_form().unwrap()
        );
    }

    #[test]
    fn test_render_by_name_without_resume_is_empty() {
        let html = render(TemplateName::Resume, None, &PhotoSource::None).unwrap();
        assert!(!html.contains("<li>"));
        let form = render(TemplateName::Form, None, &PhotoSource::None).unwrap();
        assert!(form.contains("<form"));
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("a.PNG"), "image/png");
        assert_eq!(image_mime("a.jpeg"), "image/jpeg");
        assert_eq!(image_mime("noext"), "image/jpeg");
    }
}
