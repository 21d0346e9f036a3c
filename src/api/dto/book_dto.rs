//! Book gallery and cover upload DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Book, BookId, BookStatus};

/// Gallery tile for a single book.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookSummaryDto {
    /// Book identifier.
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Cover image URL.
    pub cover: String,
    /// Reading status, if set.
    pub status: Option<BookStatus>,
}

impl From<Book> for BookSummaryDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            cover: book.cover,
            status: book.status,
        }
    }
}

/// Response body for `GET /books`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookListResponse {
    /// Books on the requested page.
    pub data: Vec<BookSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `POST /covers`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadCoverResponse {
    /// Durable download URL, to be used as the book's `cover`.
    pub url: String,
}
