//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{InboxService, LibraryService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live message inbox.
    pub inbox: Arc<InboxService>,
    /// Book gallery and add-book form.
    pub library: Arc<LibraryService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
