//! Live list reconciliation for the message inbox.
//!
//! [`LiveList`] turns a stream of [`SnapshotEvent`]s into a stable,
//! ordered, de-duplicated list. Snapshots only ever append: a record
//! already present is left untouched even if the store redelivers it, so
//! the presentation layer never re-renders unchanged entries.
//!
//! Explicitly removed entries are remembered by store identifier until a
//! snapshot arrives without them. Snapshots taken before the store applied
//! the delete can therefore not bring an entry back.
//!
//! De-duplication uses the composite key `(timestamp, sender, content)`
//! by default. Two distinct messages with identical values therefore show
//! up as a single entry. [`DedupStrategy::Identifier`] switches to the
//! store identifier instead.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::{Message, MessageId, SnapshotEvent};
use crate::error::ManagerError;

/// Which key the inbox uses to decide whether a record is already shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupStrategy {
    /// `(timestamp, sender, content)` value equality.
    #[default]
    Composite,
    /// Store identifier equality.
    Identifier,
}

impl FromStr for DedupStrategy {
    type Err = ManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "composite" => Ok(Self::Composite),
            "identifier" | "id" => Ok(Self::Identifier),
            other => Err(ManagerError::InvalidRequest(format!(
                "unknown dedup strategy `{other}`"
            ))),
        }
    }
}

impl fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite => f.write_str("composite"),
            Self::Identifier => f.write_str("identifier"),
        }
    }
}

/// Result of applying one snapshot event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Snapshot merged. `appended` holds the newly added entries in order.
    Merged {
        /// Entries that were not yet in the list.
        appended: Vec<Message>,
    },
    /// The event carried an error; the list was not modified.
    Failed {
        /// Error reported by the store.
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Composite {
        created_at: String,
        sender: String,
        content: String,
    },
    Identifier(MessageId),
}

/// Ordered, de-duplicated view of streamed messages.
///
/// Not synchronized. Callers serialize access so that no two events are
/// applied concurrently.
#[derive(Debug, Clone, Default)]
pub struct LiveList {
    strategy: DedupStrategy,
    entries: Vec<Message>,
    seen: HashSet<DedupKey>,
    removed: HashSet<MessageId>,
}

impl LiveList {
    /// Creates an empty list using the given de-duplication strategy.
    #[must_use]
    pub fn new(strategy: DedupStrategy) -> Self {
        Self {
            strategy,
            entries: Vec::new(),
            seen: HashSet::new(),
            removed: HashSet::new(),
        }
    }

    /// Returns the configured strategy.
    #[must_use]
    pub const fn strategy(&self) -> DedupStrategy {
        self.strategy
    }

    /// Applies one snapshot event.
    pub fn apply(&mut self, event: SnapshotEvent) -> ApplyOutcome {
        match event {
            SnapshotEvent::Error(reason) => ApplyOutcome::Failed { reason },
            SnapshotEvent::Snapshot(records) => ApplyOutcome::Merged {
                appended: self.merge(records),
            },
        }
    }

    /// Appends every record whose key is not yet present, in encounter
    /// order, and returns the appended records.
    ///
    /// Records with a removed identifier are skipped. An identifier stops
    /// being suppressed once a snapshot no longer carries it.
    pub fn merge(&mut self, records: Vec<Message>) -> Vec<Message> {
        if !self.removed.is_empty() {
            let present: HashSet<&MessageId> = records.iter().map(|r| &r.id).collect();
            self.removed.retain(|id| present.contains(id));
        }

        let mut appended = Vec::new();
        for record in records {
            if self.removed.contains(&record.id) {
                continue;
            }
            let key = self.key_of(&record);
            if self.seen.insert(key) {
                appended.push(record.clone());
                self.entries.push(record);
            }
        }
        appended
    }

    /// Removes the entry with the given store identifier and suppresses
    /// it in snapshots that still carry it.
    ///
    /// Returns the removed entry, or `None` if no entry matched.
    pub fn remove(&mut self, id: &MessageId) -> Option<Message> {
        self.removed.insert(id.clone());
        let pos = self.entries.iter().position(|m| &m.id == id)?;
        let removed = self.entries.remove(pos);
        let key = self.key_of(&removed);
        self.seen.remove(&key);
        Some(removed)
    }

    /// Looks up an entry by store identifier.
    #[must_use]
    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.entries.iter().find(|m| &m.id == id)
    }

    /// Current entries in first-seen order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key_of(&self, msg: &Message) -> DedupKey {
        match self.strategy {
            DedupStrategy::Composite => {
                let key = msg.composite_key();
                DedupKey::Composite {
                    created_at: key.created_at.to_string(),
                    sender: key.sender.to_string(),
                    content: key.content.to_string(),
                }
            }
            DedupStrategy::Identifier => DedupKey::Identifier(msg.id.clone()),
        }
    }
}
