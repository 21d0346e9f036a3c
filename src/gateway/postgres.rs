//! PostgreSQL implementation of the store gateways.
//!
//! Messages and books live in plain tables (see `migrations/`). The live
//! query over `messages` polls the table and pushes a full snapshot
//! whenever its contents differ from the last one delivered.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::mpsc;

use super::{BookStore, MessageStore, SNAPSHOT_FEED_CAPACITY};
use crate::config::ManagerConfig;
use crate::domain::{
    Book, BookId, BookStatus, Message, MessageId, SnapshotEvent, SnapshotFeed, StoreTimestamp,
};
use crate::error::ManagerError;

type BookRow = (
    i64,
    String,
    String,
    Option<String>,
    String,
    Vec<String>,
    Vec<String>,
    Vec<String>,
    Vec<String>,
);

const SELECT_BOOKS: &str = "SELECT id, title, cover, status, summary, key_takeaways, lessons, notes, links \
     FROM books";

/// Opens the connection pool and runs pending migrations.
///
/// # Errors
///
/// Returns [`ManagerError::StoreError`] if the database is unreachable or
/// a migration fails.
pub async fn connect(config: &ManagerConfig) -> Result<PgPool, ManagerError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| ManagerError::StoreError(e.to_string()))?;

    tracing::info!("database connected and migrated");
    Ok(pool)
}

/// PostgreSQL-backed `messages` collection.
#[derive(Debug, Clone)]
pub struct PgMessageStore {
    pool: PgPool,
    poll_interval: Duration,
}

impl PgMessageStore {
    /// Creates a store that polls for changes every `poll_interval`.
    #[must_use]
    pub fn new(pool: PgPool, poll_interval: Duration) -> Self {
        Self {
            pool,
            poll_interval,
        }
    }

    async fn fetch(pool: &PgPool) -> Result<Vec<Message>, ManagerError> {
        let rows = sqlx::query_as::<_, (String, DateTime<Utc>, String, String)>(
            "SELECT id, created_at, sender, content FROM messages ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, created_at, sender, content)| {
                Message::new(
                    MessageId::new(id),
                    StoreTimestamp::from(created_at).to_string(),
                    sender,
                    content,
                )
            })
            .collect())
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn watch(&self) -> Result<SnapshotFeed, ManagerError> {
        let initial = Self::fetch(&self.pool).await?;
        let (tx, rx) = mpsc::channel(SNAPSHOT_FEED_CAPACITY);
        let pool = self.pool.clone();
        let interval = self.poll_interval;

        tokio::spawn(async move {
            let mut last = initial.clone();
            let mut event = Some(SnapshotEvent::Snapshot(initial));
            loop {
                if let Some(ev) = event.take()
                    && tx.send(ev).await.is_err()
                {
                    break;
                }
                tokio::select! {
                    () = tx.closed() => break,
                    () = tokio::time::sleep(interval) => {}
                }
                match Self::fetch(&pool).await {
                    Ok(current) if current != last => {
                        last.clone_from(&current);
                        event = Some(SnapshotEvent::Snapshot(current));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "messages live query failed");
                        event = Some(SnapshotEvent::Error(e.to_string()));
                    }
                }
            }
            tracing::debug!("messages live query released");
        });

        Ok(rx)
    }

    async fn delete(&self, id: &MessageId) -> Result<(), ManagerError> {
        sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// PostgreSQL-backed `books` collection.
#[derive(Debug, Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn book_from_row(row: BookRow) -> Book {
    let (id, title, cover, status, summary, key_takeaways, lessons, notes, links) = row;
    Book {
        id: BookId::new(id),
        title,
        cover,
        status: status.as_deref().and_then(BookStatus::from_choice),
        summary,
        key_takeaways,
        lessons,
        notes,
        links,
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list(&self) -> Result<Vec<Book>, ManagerError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(book_from_row).collect())
    }

    async fn get(&self, id: BookId) -> Result<Option<Book>, ManagerError> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(book_from_row))
    }

    async fn insert(&self, book: &Book) -> Result<(), ManagerError> {
        sqlx::query(
            "INSERT INTO books (id, title, cover, status, summary, key_takeaways, lessons, notes, links) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(book.id.get())
        .bind(&book.title)
        .bind(&book.cover)
        .bind(book.status.map(BookStatus::as_str))
        .bind(&book.summary)
        .bind(&book.key_takeaways)
        .bind(&book.lessons)
        .bind(&book.notes)
        .bind(&book.links)
        .execute(&self.pool)
        .await?;
        tracing::info!(book_id = %book.id, "book row inserted");
        Ok(())
    }
}
