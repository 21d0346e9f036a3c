//! Opaque store identifier for messages.
//!
//! [`MessageId`] is a newtype wrapper around the string key the document
//! store assigns to each record. It is never interpreted locally, only
//! compared and echoed back on delete.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a message document.
///
/// Distinct from the composite key used for de-duplication: two records
/// with different `MessageId`s may still collapse into one visible entry
/// when their timestamp, sender and content are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wraps an identifier handed out by the store.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Generates a fresh random identifier (UUID v4, simple form).
    ///
    /// Used by gateways that must assign ids themselves.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for MessageId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
