//! Message inbox DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::MessageView;

/// Response body for `GET /messages`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageListResponse {
    /// Messages in first-seen order.
    pub data: Vec<MessageView>,
    /// Number of messages in the local view.
    pub total: usize,
}
