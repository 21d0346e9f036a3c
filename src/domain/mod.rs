//! Domain layer: typed records, the live list reconciler, and events.
//!
//! This module contains the inbox and library model: message and book
//! records validated at the store boundary, timestamp rendering, the
//! reconciler that merges streamed snapshots, and the event bus that
//! carries changes and notices to subscribers.

pub mod book;
pub mod event_bus;
pub mod manager_event;
pub mod message;
pub mod message_id;
pub mod notice;
pub mod reconciler;
pub mod snapshot;
pub mod timestamp;

pub use book::{Book, BookDraft, BookId, BookStatus};
pub use event_bus::EventBus;
pub use manager_event::{ManagerEvent, Topic};
pub use message::{CompositeKey, Message, MessageView};
pub use message_id::MessageId;
pub use notice::{Notice, NoticeLevel};
pub use reconciler::{ApplyOutcome, DedupStrategy, LiveList};
pub use snapshot::{SnapshotEvent, SnapshotFeed};
pub use timestamp::StoreTimestamp;
