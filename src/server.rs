//! Application assembly: gateway selection, state, and router.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::ManagerConfig;
use crate::domain::{DedupStrategy, EventBus};
use crate::error::ManagerError;
use crate::gateway::{
    BookStore, LocalObjectStorage, MemoryBookStore, MemoryMessageStore, MessageStore,
    ObjectStorage, PgBookStore, PgMessageStore, postgres,
};
use crate::service::{InboxService, LibraryService};
use crate::ws::handler::ws_handler;

/// URL prefix under which uploaded objects are served.
pub const FILES_ROUTE: &str = "/files";

/// Builds gateways and services from configuration and opens the inbox.
///
/// # Errors
///
/// Returns a [`ManagerError`] if the database, the storage directory, or
/// the inbox live query cannot be opened.
pub async fn build_state(config: &ManagerConfig) -> Result<AppState, ManagerError> {
    let event_bus = EventBus::new(config.event_bus_capacity);

    let messages: Arc<dyn MessageStore>;
    let books: Arc<dyn BookStore>;
    if config.persistence_enabled {
        let pool = postgres::connect(config).await?;
        messages = Arc::new(PgMessageStore::new(
            pool.clone(),
            Duration::from_millis(config.snapshot_poll_interval_ms),
        ));
        books = Arc::new(PgBookStore::new(pool));
    } else {
        tracing::warn!("persistence disabled; using in-memory stores");
        messages = Arc::new(MemoryMessageStore::new());
        books = Arc::new(MemoryBookStore::new());
    }

    let storage: Arc<dyn ObjectStorage> = Arc::new(
        LocalObjectStorage::new(config.storage_dir.clone(), config.public_base_url.clone())
            .await?,
    );

    assemble(messages, books, storage, event_bus, config.dedup_strategy).await
}

/// Wires explicit gateways into services.
///
/// # Errors
///
/// Returns the store's error if the inbox live query cannot be opened.
pub async fn assemble(
    messages: Arc<dyn MessageStore>,
    books: Arc<dyn BookStore>,
    storage: Arc<dyn ObjectStorage>,
    event_bus: EventBus,
    strategy: DedupStrategy,
) -> Result<AppState, ManagerError> {
    let inbox = InboxService::open(messages, event_bus.clone(), strategy).await?;
    let library = LibraryService::new(books, storage, event_bus.clone());
    Ok(AppState {
        inbox: Arc::new(inbox),
        library: Arc::new(library),
        event_bus,
    })
}

/// Builds the full HTTP router: REST, WebSocket, and uploaded files.
pub fn build_app(state: AppState, storage_dir: &Path) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .nest_service(FILES_ROUTE, ServeDir::new(storage_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
