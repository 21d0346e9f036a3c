//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::{SubscriptionManager, parse_topics};
use crate::domain::{ManagerEvent, MessageId};
use crate::service::InboxService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<ManagerEvent>,
    inbox: Arc<InboxService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs, &inbox).await;
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(manager_event) => {
                        if subs.matches(manager_event.topic()) {
                            let msg = WsMessage::new(
                                uuid::Uuid::new_v4().to_string(),
                                WsMessageType::Event,
                                serde_json::to_value(&manager_event).unwrap_or_default(),
                            );
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    inbox: &InboxService,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error("", 400, "malformed JSON")).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let response = match command {
        WsCommand::Subscribe { topics } => {
            let (topics, wildcard, unknown) = parse_topics(&topics);
            subs.subscribe(&topics, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": subs.topics(),
                    "wildcard": subs.is_subscribed_all(),
                    "ignored": unknown,
                }),
            )
        }
        WsCommand::Unsubscribe { topics } => {
            let (topics, wildcard, unknown) = parse_topics(&topics);
            subs.unsubscribe(&topics, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": subs.topics(),
                    "wildcard": subs.is_subscribed_all(),
                    "ignored": unknown,
                }),
            )
        }
        WsCommand::ListMessages => {
            let views = inbox.views().await;
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({ "total": views.len(), "data": views }),
            )
        }
        WsCommand::DeleteMessage { message_id } => {
            match inbox.delete(&MessageId::new(message_id.clone())).await {
                Ok(removed) => WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({
                        "deleted": message_id,
                        "was_listed": removed.is_some(),
                    }),
                ),
                Err(e) => WsMessage::error(msg.id, e.error_code(), &e.to_string()),
            }
        }
    };

    serde_json::to_string(&response).ok()
}
