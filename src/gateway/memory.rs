//! In-memory gateways.
//!
//! Used when persistence is disabled and throughout the test suite. The
//! message store keeps schemaless documents, like the real document
//! database, and validates them into typed records only when building a
//! snapshot. Failure switches let tests exercise every error path.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{RwLock, broadcast, mpsc};

use super::{BookStore, MessageStore, ObjectStorage, SNAPSHOT_FEED_CAPACITY, decode_documents};
use crate::domain::message::{FIELD_CONTENT, FIELD_CREATED_AT, FIELD_SENDER};
use crate::domain::{
    Book, BookId, Message, MessageId, SnapshotEvent, SnapshotFeed, StoreTimestamp,
};
use crate::error::ManagerError;

#[derive(Debug, Clone)]
enum StoreSignal {
    Changed,
    Error(String),
}

#[derive(Debug)]
struct MessageInner {
    docs: RwLock<Vec<(MessageId, serde_json::Value)>>,
    signals: broadcast::Sender<StoreSignal>,
    fail_watch: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MessageInner {
    async fn snapshot(&self) -> Vec<Message> {
        let docs = self.docs.read().await;
        decode_documents(docs.iter().map(|(id, doc)| (id, doc)))
    }
}

/// In-memory `messages` collection with live queries.
#[derive(Debug, Clone)]
pub struct MemoryMessageStore {
    inner: Arc<MessageInner>,
}

impl MemoryMessageStore {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        let (signals, _) = broadcast::channel(SNAPSHOT_FEED_CAPACITY);
        Self {
            inner: Arc::new(MessageInner {
                docs: RwLock::new(Vec::new()),
                signals,
                fail_watch: AtomicBool::new(false),
                fail_deletes: AtomicBool::new(false),
            }),
        }
    }

    /// Writes a raw document, replacing any document with the same id,
    /// and notifies live queries.
    pub async fn put_document(&self, id: MessageId, doc: serde_json::Value) {
        {
            let mut docs = self.inner.docs.write().await;
            match docs.iter_mut().find(|(existing, _)| *existing == id) {
                Some((_, slot)) => *slot = doc,
                None => docs.push((id, doc)),
            }
        }
        let _ = self.inner.signals.send(StoreSignal::Changed);
    }

    /// Writes a new message stamped with the current time, the way an
    /// external writer (the website's contact form) would.
    pub async fn insert(&self, sender: &str, content: &str) -> MessageId {
        self.insert_at(Utc::now(), sender, content).await
    }

    /// Writes a new message with an explicit creation time.
    pub async fn insert_at(&self, at: DateTime<Utc>, sender: &str, content: &str) -> MessageId {
        let id = MessageId::generate();
        let doc = json!({
            FIELD_CREATED_AT: StoreTimestamp::from(at).to_string(),
            FIELD_SENDER: sender,
            FIELD_CONTENT: content,
        });
        self.put_document(id.clone(), doc).await;
        id
    }

    /// Delivers an error notification to every live query.
    pub fn push_error(&self, reason: &str) {
        let _ = self.inner.signals.send(StoreSignal::Error(reason.to_string()));
    }

    /// Makes subsequent [`MessageStore::watch`] calls fail.
    pub fn set_fail_watch(&self, fail: bool) {
        self.inner.fail_watch.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent [`MessageStore::delete`] calls fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.inner.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Returns `true` if a document with the given id is stored.
    pub async fn contains(&self, id: &MessageId) -> bool {
        self.inner.docs.read().await.iter().any(|(doc_id, _)| doc_id == id)
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.inner.docs.read().await.len()
    }

    /// Number of live queries currently attached.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.signals.receiver_count()
    }
}

impl Default for MemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn watch(&self) -> Result<SnapshotFeed, ManagerError> {
        if self.inner.fail_watch.load(Ordering::SeqCst) {
            return Err(ManagerError::StoreError("live query rejected".to_string()));
        }

        let (tx, rx) = mpsc::channel(SNAPSHOT_FEED_CAPACITY);
        let mut signals = self.inner.signals.subscribe();
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let mut event = SnapshotEvent::Snapshot(inner.snapshot().await);
            loop {
                if tx.send(event).await.is_err() {
                    break;
                }
                event = tokio::select! {
                    () = tx.closed() => break,
                    signal = signals.recv() => match signal {
                        Ok(StoreSignal::Changed) | Err(RecvError::Lagged(_)) => {
                            SnapshotEvent::Snapshot(inner.snapshot().await)
                        }
                        Ok(StoreSignal::Error(reason)) => SnapshotEvent::Error(reason),
                        Err(RecvError::Closed) => break,
                    },
                };
            }
            tracing::debug!("memory live query released");
        });

        Ok(rx)
    }

    async fn delete(&self, id: &MessageId) -> Result<(), ManagerError> {
        if self.inner.fail_deletes.load(Ordering::SeqCst) {
            return Err(ManagerError::StoreError(format!("delete of {id} rejected")));
        }
        self.inner
            .docs
            .write()
            .await
            .retain(|(doc_id, _)| doc_id != id);
        let _ = self.inner.signals.send(StoreSignal::Changed);
        Ok(())
    }
}

/// In-memory `books` collection.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    insert_calls: AtomicUsize,
}

impl MemoryBookStore {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent reads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent inserts fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of times [`BookStore::insert`] was called, failed or not.
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), ManagerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ManagerError::StoreError("books unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, ManagerError> {
        self.check_reads()?;
        Ok(self.books.read().await.clone())
    }

    async fn get(&self, id: BookId) -> Result<Option<Book>, ManagerError> {
        self.check_reads()?;
        Ok(self
            .books
            .read()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn insert(&self, book: &Book) -> Result<(), ManagerError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ManagerError::StoreError("insert rejected".to_string()));
        }
        let mut books = self.books.write().await;
        if books.iter().any(|b| b.id == book.id) {
            return Err(ManagerError::StoreError(format!(
                "book {} already exists",
                book.id
            )));
        }
        books.push(book.clone());
        Ok(())
    }
}

/// In-memory object storage.
#[derive(Debug)]
pub struct MemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
}

impl MemoryObjectStorage {
    /// Creates an empty bucket whose URLs start with `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    /// Makes subsequent uploads fail.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Returns the stored bytes at `path`.
    pub async fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(path).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, ManagerError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ManagerError::StorageError(format!("upload of {path} rejected")));
        }
        self.objects.write().await.insert(path.to_string(), bytes);
        Ok(super::join_url(&self.base_url, path))
    }
}
