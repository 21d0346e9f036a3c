//! Data Transfer Objects for REST request/response serialization.
//!
//! Book records and the add-book form are exchanged in their domain
//! shape ([`crate::domain::Book`], [`crate::domain::BookDraft`]); the
//! types here wrap lists and uploads.

pub mod book_dto;
pub mod common_dto;
pub mod message_dto;

pub use book_dto::*;
pub use common_dto::*;
pub use message_dto::*;
