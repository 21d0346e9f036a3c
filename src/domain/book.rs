//! Books and the add-book form.
//!
//! A [`BookDraft`] is the raw form state, with list fields still
//! comma-joined. [`BookDraft::validate`] enforces the submission rules and
//! produces the [`Book`] record that is inserted into the store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ManagerError;

/// Locally generated book identifier, derived from creation time
/// (milliseconds since the Unix epoch).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Derives an identifier from a creation instant.
    #[must_use]
    pub fn from_created_at(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reading progress of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookStatus {
    /// Currently being read.
    Reading,
    /// Finished.
    Read,
}

impl BookStatus {
    /// Maps a dropdown choice to a status. Anything other than `"Reading"`
    /// or `"Read"` (including the `"Status"` placeholder) means unset.
    #[must_use]
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "Reading" => Some(Self::Reading),
            "Read" => Some(Self::Read),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Read => "Read",
        }
    }
}

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Creation-time identifier.
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Remote cover image URL.
    pub cover: String,
    /// Reading status, if chosen.
    pub status: Option<BookStatus>,
    /// Summary text.
    pub summary: String,
    /// Key takeaways.
    pub key_takeaways: Vec<String>,
    /// Lessons learned.
    pub lessons: Vec<String>,
    /// Free-form notes.
    pub notes: Vec<String>,
    /// Related links.
    pub links: Vec<String>,
}

/// Raw add-book form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BookDraft {
    /// Title field.
    pub title: String,
    /// Pasted cover URL or the URL of an uploaded image.
    pub cover: String,
    /// Dropdown choice: `"Reading"`, `"Read"`, or anything else for unset.
    pub status: String,
    /// Summary field.
    pub summary: String,
    /// Comma-separated key takeaways.
    pub key_takeaways: String,
    /// Comma-separated lessons.
    pub lessons: String,
    /// Comma-separated notes.
    pub notes: String,
    /// Comma-separated links.
    pub links: String,
}

impl BookDraft {
    /// Returns `true` when the submit action should be enabled: title and
    /// summary are both non-empty.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        !self.title.is_empty() && !self.summary.is_empty()
    }

    /// Validates the form and builds the record to persist.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::MissingTitle`] or
    /// [`ManagerError::MissingSummary`] when the form is not submittable,
    /// then [`ManagerError::MissingCover`] when no cover was given.
    pub fn validate(&self, id: BookId) -> Result<Book, ManagerError> {
        if self.title.is_empty() {
            return Err(ManagerError::MissingTitle);
        }
        if self.summary.is_empty() {
            return Err(ManagerError::MissingSummary);
        }
        if self.cover.is_empty() {
            return Err(ManagerError::MissingCover);
        }
        Ok(Book {
            id,
            title: self.title.clone(),
            cover: self.cover.clone(),
            status: BookStatus::from_choice(&self.status),
            summary: self.summary.clone(),
            key_takeaways: split_list(&self.key_takeaways),
            lessons: split_list(&self.lessons),
            notes: split_list(&self.notes),
            links: split_list(&self.links),
        })
    }
}

/// Splits comma-joined form text into its non-empty pieces.
///
/// Pieces are kept verbatim; surrounding whitespace is not trimmed.
#[must_use]
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn draft() -> BookDraft {
        BookDraft {
            title: "Deep Work".to_string(),
            cover: "https://covers.example/deep-work.jpg".to_string(),
            status: "Reading".to_string(),
            summary: "Focus is a skill.".to_string(),
            key_takeaways: "focus,,depth".to_string(),
            lessons: "schedule shallow work".to_string(),
            notes: String::new(),
            links: "https://a.example,https://b.example".to_string(),
        }
    }

    #[test]
    fn split_drops_empty_pieces_only() {
        assert_eq!(split_list("a,,b,"), vec!["a", "b"]);
        assert_eq!(split_list(" a, b"), vec![" a", " b"]);
        assert!(split_list("").is_empty());
        assert!(split_list(",,,").is_empty());
    }

    #[test]
    fn validate_builds_record() {
        let Ok(book) = draft().validate(BookId::new(7)) else {
            panic!("draft should validate");
        };
        assert_eq!(book.id.get(), 7);
        assert_eq!(book.status, Some(BookStatus::Reading));
        assert_eq!(book.key_takeaways, vec!["focus", "depth"]);
        assert!(book.notes.is_empty());
        assert_eq!(book.links.len(), 2);
    }

    #[test]
    fn empty_title_or_summary_is_not_submittable() {
        let mut d = draft();
        d.title.clear();
        assert!(!d.is_submittable());
        assert!(matches!(d.validate(BookId::new(1)), Err(ManagerError::MissingTitle)));

        let mut d = draft();
        d.summary.clear();
        assert!(!d.is_submittable());
        assert!(matches!(d.validate(BookId::new(1)), Err(ManagerError::MissingSummary)));
    }

    #[test]
    fn empty_cover_is_rejected_after_enablement_check() {
        let mut d = draft();
        d.cover.clear();
        assert!(d.is_submittable());
        assert!(matches!(d.validate(BookId::new(1)), Err(ManagerError::MissingCover)));
    }

    #[test]
    fn placeholder_status_is_unset() {
        assert_eq!(BookStatus::from_choice("Status"), None);
        assert_eq!(BookStatus::from_choice("Read"), Some(BookStatus::Read));
    }

    #[test]
    fn book_uses_camel_case_wire_keys() {
        let Ok(book) = draft().validate(BookId::new(1)) else {
            panic!("draft should validate");
        };
        let Ok(json) = serde_json::to_value(&book) else {
            panic!("serialization failed");
        };
        assert!(json.get("keyTakeaways").is_some());
        assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("Reading"));
        assert_eq!(json.get("id").and_then(serde_json::Value::as_i64), Some(1));
    }

    #[test]
    fn id_from_creation_time_is_millis() {
        let Some(at) = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123) else {
            panic!("valid instant");
        };
        assert_eq!(BookId::from_created_at(at).get(), 1_700_000_000_123);
    }
}
