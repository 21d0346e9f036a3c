//! Domain events reflecting inbox and library changes.
//!
//! Every visible change emits a [`ManagerEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers,
//! which is how a presentation layer learns about appended or removed
//! messages and transient notices.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, MessageView, Notice, NoticeLevel};

/// Coarse event category used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Message list changes.
    Inbox,
    /// Book list changes.
    Books,
    /// Transient notices.
    Notices,
}

impl Topic {
    /// All topics, in declaration order.
    pub const ALL: [Self; 3] = [Self::Inbox, Self::Books, Self::Notices];

    /// Returns the topic name as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Books => "books",
            Self::Notices => "notices",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbox" => Ok(Self::Inbox),
            "books" => Ok(Self::Books),
            "notices" => Ok(Self::Notices),
            other => Err(format!("unknown topic `{other}`")),
        }
    }
}

/// Domain event emitted after every visible change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ManagerEvent {
    /// A snapshot added a message to the inbox.
    MessageAppended {
        /// Render-ready message.
        message: MessageView,
        /// When the message entered the local view.
        timestamp: DateTime<Utc>,
    },

    /// A message was deleted from the store and the local view.
    MessageRemoved {
        /// Store identifier of the removed message.
        message_id: String,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A book was inserted.
    BookAdded {
        /// Book identifier.
        book_id: BookId,
        /// Book title.
        title: String,
        /// Insert timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A transient notification for the user.
    Notice {
        /// Severity.
        level: NoticeLevel,
        /// Text shown to the user.
        text: String,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ManagerEvent {
    /// Wraps a [`Notice`] as an event stamped with the current time.
    #[must_use]
    pub fn notice(notice: Notice) -> Self {
        Self::Notice {
            level: notice.level,
            text: notice.text,
            timestamp: Utc::now(),
        }
    }

    /// Returns the topic this event belongs to.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::MessageAppended { .. } | Self::MessageRemoved { .. } => Topic::Inbox,
            Self::BookAdded { .. } => Topic::Books,
            Self::Notice { .. } => Topic::Notices,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::MessageAppended { .. } => "message_appended",
            Self::MessageRemoved { .. } => "message_removed",
            Self::BookAdded { .. } => "book_added",
            Self::Notice { .. } => "notice",
        }
    }
}
