//! Inbound message records.
//!
//! A [`Message`] is the typed form of a document from the `messages`
//! collection. Conversion from the store's loosely typed key/value shape
//! happens once, at the gateway boundary, in [`Message::from_document`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MessageId;
use super::timestamp;
use crate::error::ManagerError;

/// Document field holding the store-native creation timestamp.
pub const FIELD_CREATED_AT: &str = "createdAt";
/// Document field holding the sender name.
pub const FIELD_SENDER: &str = "sender";
/// Document field holding the message body.
pub const FIELD_CONTENT: &str = "content";

/// A message as held in the live inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store identifier.
    pub id: MessageId,
    /// Store-native timestamp text, e.g.
    /// `Timestamp(seconds=1700000000, nanoseconds=0)`.
    pub created_at: String,
    /// Sender name.
    pub sender: String,
    /// Message body.
    pub content: String,
}

/// Value-based identity of a message: `(timestamp, sender, content)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeKey<'a> {
    /// Timestamp text.
    pub created_at: &'a str,
    /// Sender name.
    pub sender: &'a str,
    /// Message body.
    pub content: &'a str,
}

impl Message {
    /// Creates a message from already-typed parts.
    #[must_use]
    pub fn new(
        id: MessageId,
        created_at: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            created_at: created_at.into(),
            sender: sender.into(),
            content: content.into(),
        }
    }

    /// Converts a raw store document into a typed message.
    ///
    /// String fields are taken verbatim, other scalars are stringified.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidDocument`] if the document is not an
    /// object, or if `createdAt`, `sender` or `content` is missing or null.
    pub fn from_document(id: MessageId, doc: &serde_json::Value) -> Result<Self, ManagerError> {
        let Some(fields) = doc.as_object() else {
            return Err(ManagerError::InvalidDocument {
                id: id.to_string(),
                reason: "document is not an object".to_string(),
            });
        };
        let field = |name: &str| -> Result<String, ManagerError> {
            match fields.get(name) {
                Some(serde_json::Value::String(s)) => Ok(s.clone()),
                Some(serde_json::Value::Null) | None => Err(ManagerError::InvalidDocument {
                    id: id.to_string(),
                    reason: format!("missing field `{name}`"),
                }),
                Some(other) => Ok(other.to_string()),
            }
        };
        let created_at = field(FIELD_CREATED_AT)?;
        let sender = field(FIELD_SENDER)?;
        let content = field(FIELD_CONTENT)?;
        Ok(Self {
            id,
            created_at,
            sender,
            content,
        })
    }

    /// Returns the value-based de-duplication key.
    #[must_use]
    pub fn composite_key(&self) -> CompositeKey<'_> {
        CompositeKey {
            created_at: &self.created_at,
            sender: &self.sender,
            content: &self.content,
        }
    }

    /// Returns the render-ready view of this message.
    #[must_use]
    pub fn view(&self) -> MessageView {
        MessageView {
            id: self.id.to_string(),
            sender: self.sender.clone(),
            content: self.content.clone(),
            sent_at: timestamp::render(&self.created_at),
        }
    }
}

/// Render-ready message card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessageView {
    /// Store identifier, used as the render key and for deletion.
    pub id: String,
    /// Sender name.
    pub sender: String,
    /// Message body.
    pub content: String,
    /// Local-time `dd-MM-yyyy HH:mm`, or `Invalid timestamp`.
    pub sent_at: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_document_reads_typed_fields() {
        let doc = json!({
            "createdAt": "Timestamp(seconds=1700000000, nanoseconds=0)",
            "sender": "ana",
            "content": "loved the last post",
        });
        let Ok(msg) = Message::from_document(MessageId::new("m1"), &doc) else {
            panic!("document should convert");
        };
        assert_eq!(msg.sender, "ana");
        assert_eq!(msg.content, "loved the last post");
        assert_eq!(msg.id.as_str(), "m1");
    }

    #[test]
    fn from_document_rejects_missing_field() {
        let doc = json!({ "createdAt": "x", "sender": "ana" });
        let result = Message::from_document(MessageId::new("m2"), &doc);
        let Err(ManagerError::InvalidDocument { id, reason }) = result else {
            panic!("expected InvalidDocument");
        };
        assert_eq!(id, "m2");
        assert!(reason.contains("content"));
    }

    #[test]
    fn from_document_rejects_null_field() {
        let doc = json!({ "createdAt": "x", "sender": null, "content": "hi" });
        assert!(Message::from_document(MessageId::new("m3"), &doc).is_err());
    }

    #[test]
    fn from_document_stringifies_scalars() {
        let doc = json!({ "createdAt": 1700000000, "sender": "bot", "content": true });
        let Ok(msg) = Message::from_document(MessageId::new("m4"), &doc) else {
            panic!("scalars should be accepted");
        };
        assert_eq!(msg.created_at, "1700000000");
        assert_eq!(msg.content, "true");
    }

    #[test]
    fn from_document_rejects_non_object() {
        let doc = json!(["not", "a", "map"]);
        assert!(Message::from_document(MessageId::new("m5"), &doc).is_err());
    }

    #[test]
    fn composite_key_ignores_id() {
        let a = Message::new(MessageId::new("a"), "t", "s", "c");
        let b = Message::new(MessageId::new("b"), "t", "s", "c");
        assert_eq!(a.composite_key(), b.composite_key());
    }

    #[test]
    fn view_falls_back_on_bad_timestamp() {
        let msg = Message::new(MessageId::new("a"), "yesterday", "s", "c");
        assert_eq!(msg.view().sent_at, timestamp::INVALID_TIMESTAMP);
    }
}
