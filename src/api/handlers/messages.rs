//! Message inbox handlers: list and delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::dto::MessageListResponse;
use crate::app_state::AppState;
use crate::domain::MessageId;
use crate::error::{ErrorResponse, ManagerError};

/// `GET /messages` — Current inbox contents.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    tag = "Messages",
    summary = "List inbox messages",
    description = "Returns the live inbox in first-seen order. Timestamps are rendered as `dd-MM-yyyy HH:mm` local time, or `Invalid timestamp`.",
    responses(
        (status = 200, description = "Inbox contents", body = MessageListResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ManagerError> {
    let data = state.inbox.views().await;
    let total = data.len();
    Ok(Json(MessageListResponse { data, total }))
}

/// `DELETE /messages/:id` — Delete a message from the store and the inbox.
///
/// # Errors
///
/// Returns [`ManagerError::StoreError`] if the store rejects the delete.
#[utoipa::path(
    delete,
    path = "/api/v1/messages/{id}",
    tag = "Messages",
    summary = "Delete a message",
    description = "Deletes the message from the store; the inbox entry is removed once the store confirms. Unknown ids are not an error.",
    params(
        ("id" = String, Path, description = "Store identifier"),
    ),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 500, description = "Store rejected the delete", body = ErrorResponse),
    )
)]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ManagerError> {
    state.inbox.delete(&MessageId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Inbox routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages))
        .route("/messages/{id}", delete(delete_message))
}
