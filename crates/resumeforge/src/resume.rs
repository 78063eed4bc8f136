//! Core resume types for resumeforge.
//!
//! A resume is created once from a form submission and never modified
//! afterwards. List-valued fields are stored as a single text column; the
//! codec for that lives here so both directions stay in one place.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Declaration used when the form omits the field entirely.
pub const DEFAULT_DECLARATION: &str =
    "I hereby declare that the information provided is true to the best of my knowledge.";

/// Format of the `date` field, fixed at submission time.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// The field set of a resume that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewResume {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Date of birth, free text.
    pub dob: String,
    /// Postal address.
    pub address: String,
    /// Nationality.
    pub nationality: String,
    /// Professional network profile link.
    pub linkedin: String,
    /// Skills in submission order.
    pub skills: Vec<String>,
    /// Spoken languages in submission order.
    pub languages: Vec<String>,
    /// Hobbies in submission order.
    pub hobbies: Vec<String>,
    /// Career objective.
    pub objective: String,
    /// Work experience.
    pub experience: String,
    /// Education history.
    pub education: String,
    /// Closing declaration statement.
    pub declaration: String,
    /// Submission date, formatted with [`DATE_FORMAT`].
    pub date: String,
    /// File name of the uploaded photo, empty when none was uploaded.
    pub photo: String,
}

/// A stored resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    /// Identifier assigned by the store.
    pub id: i64,
    /// The submitted fields.
    #[serde(flatten)]
    pub fields: NewResume,
}

/// A short listing entry for a stored resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSummary {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Submission date.
    pub date: String,
}

impl NewResume {
    /// Stamp the submission date from the given instant.
    pub fn stamp_date(&mut self, now: DateTime<Local>) {
        self.date = now.format(DATE_FORMAT).to_string();
    }

    /// Whether a photo was attached to this resume.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        !self.photo.is_empty()
    }
}

impl Resume {
    /// Whether a photo was attached to this resume.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        self.fields.has_photo()
    }
}

/// Encode a list field for storage in a single text column.
#[must_use]
pub fn encode_list(items: &[String]) -> String {
    // A Vec<String> always serializes.
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a list field previously written by [`encode_list`].
///
/// Rows written as plain comma-joined text are also accepted.
#[must_use]
pub fn decode_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items;
        }
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_resume_default_is_empty() {
        let resume = NewResume::default();
        assert!(resume.name.is_empty());
        assert!(resume.skills.is_empty());
        assert!(!resume.has_photo());
    }

    #[test]
    fn test_stamp_date() {
        let mut resume = NewResume::default();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        resume.stamp_date(now);
        assert_eq!(resume.date, "09/03/2024");
    }

    #[test]
    fn test_list_codec_preserves_order() {
        let skills = vec!["rust".to_string(), "sql".to_string(), "html".to_string()];
        let encoded = encode_list(&skills);
        assert_eq!(decode_list(&encoded), skills);
    }

    #[test]
    fn test_list_codec_keeps_commas_inside_items() {
        let items = vec!["Paris, France".to_string(), "Lyon".to_string()];
        assert_eq!(decode_list(&encode_list(&items)), items);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_list("").is_empty());
        assert!(decode_list("[]").is_empty());
        assert!(decode_list("   ").is_empty());
    }

    #[test]
    fn test_decode_comma_joined() {
        assert_eq!(
            decode_list("math, logic,,poetry"),
            vec!["math".to_string(), "logic".to_string(), "poetry".to_string()]
        );
    }

    #[test]
    fn test_resume_serializes_flat() {
        let resume = Resume {
            id: 1,
            fields: NewResume {
                name: "Ada Lovelace".to_string(),
                ..NewResume::default()
            },
        };
        let json = serde_json::to_value(&resume).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Ada Lovelace");
    }
}
