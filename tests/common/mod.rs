//! Shared fixtures for integration tests.

#![allow(clippy::panic, dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use site_manager::app_state::AppState;
use site_manager::domain::{DedupStrategy, EventBus};
use site_manager::gateway::{
    BookStore, LocalObjectStorage, MemoryBookStore, MemoryMessageStore, MessageStore,
    ObjectStorage,
};
use site_manager::server;

pub const PUBLIC_BASE_URL: &str = "http://localhost:3000/files";

/// A fully wired application over in-memory stores and a scratch
/// storage directory.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub messages: MemoryMessageStore,
    pub books: Arc<MemoryBookStore>,
    pub storage_dir: PathBuf,
}

impl TestApp {
    pub async fn new() -> Self {
        let storage_dir =
            std::env::temp_dir().join(format!("site-manager-it-{}", uuid::Uuid::new_v4()));
        let messages = MemoryMessageStore::new();
        let books = Arc::new(MemoryBookStore::new());
        let Ok(storage) = LocalObjectStorage::new(storage_dir.clone(), PUBLIC_BASE_URL).await
        else {
            panic!("storage init failed");
        };

        let Ok(state) = server::assemble(
            Arc::new(messages.clone()) as Arc<dyn MessageStore>,
            Arc::clone(&books) as Arc<dyn BookStore>,
            Arc::new(storage) as Arc<dyn ObjectStorage>,
            EventBus::new(256),
            DedupStrategy::Composite,
        )
        .await
        else {
            panic!("state assembly failed");
        };

        let app = server::build_app(state.clone(), &storage_dir);
        Self {
            app,
            state,
            messages,
            books,
            storage_dir,
        }
    }

    /// Waits until the inbox holds `len` messages.
    pub async fn wait_for_inbox(&self, len: usize) {
        for _ in 0..200 {
            if self.state.inbox.len().await == len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("inbox never reached {len} entries");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.storage_dir);
    }
}
