//! Snapshot notifications delivered by a live query.

use tokio::sync::mpsc;

use super::Message;

/// One push update from the message store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEvent {
    /// The currently known matching records, in store order.
    Snapshot(Vec<Message>),
    /// The live query reported an error. The subscription stays open.
    Error(String),
}

/// Receiving half of a live query.
///
/// Dropping it tells the producing gateway to stop listening.
pub type SnapshotFeed = mpsc::Receiver<SnapshotEvent>;
