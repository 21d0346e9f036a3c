//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes inbox, book and notice events
//! to subscribed clients and accepts inbox commands.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
