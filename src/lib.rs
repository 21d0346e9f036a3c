//! # site-manager
//!
//! Headless core of a personal website manager: a live inbox of messages
//! sent through the website and the owner's book list.
//!
//! The inbox mirrors a live query over the document store into an
//! ordered, de-duplicated list and deletes messages only after the store
//! confirms. The library validates the add-book form and uploads cover
//! images. Any UI binds to it over REST and WebSocket.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── InboxService, LibraryService (service/)
//!     ├── LiveList reconciler, EventBus (domain/)
//!     │
//!     └── Gateways (gateway/)
//!           ├── MessageStore, BookStore: PostgreSQL or in-memory
//!           └── ObjectStorage: filesystem or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod server;
pub mod service;
pub mod ws;
