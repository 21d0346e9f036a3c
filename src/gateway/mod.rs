//! Gateways to the external document store and object storage.
//!
//! Services receive these as explicit `Arc<dyn …>` dependencies. The
//! traits are the only seam to the backing services; the in-memory,
//! PostgreSQL, and filesystem implementations live in the submodules.

pub mod local_storage;
pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Book, BookId, Message, MessageId, SnapshotFeed};
use crate::error::ManagerError;

pub use local_storage::LocalObjectStorage;
pub use memory::{MemoryBookStore, MemoryMessageStore, MemoryObjectStorage};
pub use postgres::{PgBookStore, PgMessageStore};

/// Capacity of the channel behind a [`SnapshotFeed`].
pub const SNAPSHOT_FEED_CAPACITY: usize = 32;

/// Folder under which book cover images are uploaded.
pub const COVER_FOLDER: &str = "book_images";

/// Live-queryable `messages` collection.
#[async_trait]
pub trait MessageStore: Send + Sync + fmt::Debug {
    /// Opens a live query over the collection.
    ///
    /// The feed first yields the current snapshot, then one snapshot per
    /// change. Dropping the feed releases the listener.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::StoreError`] if the query cannot be opened.
    async fn watch(&self) -> Result<SnapshotFeed, ManagerError>;

    /// Deletes the document with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::StoreError`] if the store rejects the delete.
    async fn delete(&self, id: &MessageId) -> Result<(), ManagerError>;
}

/// The `books` collection.
#[async_trait]
pub trait BookStore: Send + Sync + fmt::Debug {
    /// Fetches every stored book.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::StoreError`] on read failure.
    async fn list(&self) -> Result<Vec<Book>, ManagerError>;

    /// Fetches one book by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::StoreError`] on read failure.
    async fn get(&self, id: BookId) -> Result<Option<Book>, ManagerError>;

    /// Inserts a new book.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::StoreError`] on write failure.
    async fn insert(&self, book: &Book) -> Result<(), ManagerError>;
}

/// Binary object storage with durable download URLs.
#[async_trait]
pub trait ObjectStorage: Send + Sync + fmt::Debug {
    /// Uploads `bytes` to `path` and returns its download URL.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::StorageError`] if the upload fails.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, ManagerError>;
}

/// Generates a fresh upload path for a book cover:
/// `book_images/<uuid-v4>.jpg`.
#[must_use]
pub fn cover_path() -> String {
    format!("{COVER_FOLDER}/{}.jpg", uuid::Uuid::new_v4())
}

/// Converts raw store documents into typed messages.
///
/// Documents that fail boundary validation are logged and left out.
#[must_use]
pub fn decode_documents<'a, I>(docs: I) -> Vec<Message>
where
    I: IntoIterator<Item = (&'a MessageId, &'a serde_json::Value)>,
{
    docs.into_iter()
        .filter_map(
            |(id, doc)| match Message::from_document(id.clone(), doc) {
                Ok(msg) => Some(msg),
                Err(e) => {
                    tracing::warn!(%id, error = %e, "skipping malformed message document");
                    None
                }
            },
        )
        .collect()
}

/// Joins a public base URL and an object path with exactly one `/`.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
