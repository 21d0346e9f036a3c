//! Transient user-visible notifications.

use serde::Serialize;
use utoipa::ToSchema;

/// Shown when the live message query reports an error.
pub const SUBSCRIPTION_FAILED: &str = "Something went wrong";
/// Shown after the store confirms a message deletion.
pub const MESSAGE_DELETED: &str = "Message deleted";
/// Shown when the store rejects a message deletion.
pub const MESSAGE_DELETE_FAILED: &str = "Error deleting message!";
/// Shown when a book is submitted without a cover.
pub const COVER_REQUIRED: &str = "Please select or enter a cover image.";
/// Shown after a book insert succeeds.
pub const BOOK_ADDED: &str = "Book added successfully!";
/// Shown when a book insert fails.
pub const BOOK_ADD_FAILED: &str = "Error adding book";
/// Shown when the cover upload fails.
pub const COVER_UPLOAD_FAILED: &str = "Image upload failed";
/// Shown when the book gallery cannot be loaded.
pub const BOOKS_FETCH_FAILED: &str = "Failed to fetch books.";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// A failed action; local state was left unchanged.
    Error,
}

/// Short-lived, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub text: String,
}

impl Notice {
    /// Creates an informational notice.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
