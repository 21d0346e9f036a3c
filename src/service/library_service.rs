//! Library service: book gallery, detail view, and the add-book form.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::notice::{
    BOOK_ADD_FAILED, BOOK_ADDED, BOOKS_FETCH_FAILED, COVER_REQUIRED, COVER_UPLOAD_FAILED,
};
use crate::domain::{Book, BookDraft, BookId, EventBus, ManagerEvent, Notice};
use crate::error::ManagerError;
use crate::gateway::{BookStore, ObjectStorage, cover_path};

/// Orchestrates book reads, cover uploads, and book submission.
///
/// Every failure is reported twice: as the returned error and as a
/// transient notice on the [`EventBus`].
#[derive(Debug, Clone)]
pub struct LibraryService {
    books: Arc<dyn BookStore>,
    storage: Arc<dyn ObjectStorage>,
    event_bus: EventBus,
}

impl LibraryService {
    /// Creates a new `LibraryService`.
    #[must_use]
    pub fn new(
        books: Arc<dyn BookStore>,
        storage: Arc<dyn ObjectStorage>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            books,
            storage,
            event_bus,
        }
    }

    /// Fetches every book for the gallery.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the fetch fails.
    pub async fn list_books(&self) -> Result<Vec<Book>, ManagerError> {
        self.books.list().await.inspect_err(|e| {
            tracing::warn!(error = %e, "book fetch failed");
            self.event_bus.notify(Notice::error(BOOKS_FETCH_FAILED));
        })
    }

    /// Fetches a single book for the detail view.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::BookNotFound`] if no book has this id, or
    /// the store's error if the fetch fails.
    pub async fn get_book(&self, id: BookId) -> Result<Book, ManagerError> {
        self.books
            .get(id)
            .await?
            .ok_or(ManagerError::BookNotFound(id.get()))
    }

    /// Uploads a cover image under `book_images/` and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidRequest`] for an empty upload, or the
    /// storage error if the upload fails.
    pub async fn upload_cover(&self, bytes: Vec<u8>) -> Result<String, ManagerError> {
        if bytes.is_empty() {
            return Err(ManagerError::InvalidRequest("empty image upload".to_string()));
        }
        let path = cover_path();
        match self.storage.upload(&path, bytes).await {
            Ok(url) => {
                tracing::info!(path, "cover uploaded");
                Ok(url)
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "cover upload failed");
                self.event_bus.notify(Notice::error(COVER_UPLOAD_FAILED));
                Err(e)
            }
        }
    }

    /// Validates the form and inserts the book.
    ///
    /// Validation runs before any store call. The book id is taken from
    /// the current time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::MissingTitle`],
    /// [`ManagerError::MissingSummary`] or [`ManagerError::MissingCover`]
    /// for an incomplete form, or the store's error if the insert fails.
    pub async fn submit(&self, draft: &BookDraft) -> Result<Book, ManagerError> {
        let book = draft
            .validate(BookId::from_created_at(Utc::now()))
            .inspect_err(|e| {
                if matches!(e, ManagerError::MissingCover) {
                    self.event_bus.notify(Notice::error(COVER_REQUIRED));
                }
            })?;

        if let Err(e) = self.books.insert(&book).await {
            tracing::warn!(book_id = %book.id, error = %e, "book insert failed");
            self.event_bus.notify(Notice::error(BOOK_ADD_FAILED));
            return Err(e);
        }

        self.event_bus.publish(ManagerEvent::BookAdded {
            book_id: book.id,
            title: book.title.clone(),
            timestamp: Utc::now(),
        });
        self.event_bus.notify(Notice::info(BOOK_ADDED));
        tracing::info!(book_id = %book.id, title = %book.title, "book added");
        Ok(book)
    }
}
