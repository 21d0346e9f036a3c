//! Inbox service: keeps the live message list in sync with the store.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::SubscriptionHandle;
use crate::domain::notice::{MESSAGE_DELETE_FAILED, MESSAGE_DELETED, SUBSCRIPTION_FAILED};
use crate::domain::{
    ApplyOutcome, DedupStrategy, EventBus, LiveList, ManagerEvent, Message, MessageId,
    MessageView, Notice, SnapshotFeed,
};
use crate::error::ManagerError;
use crate::gateway::MessageStore;

/// Owns the live message list for one open inbox.
///
/// A single consumer task applies snapshot events to the list one at a
/// time. Deletions go to the store first; the local entry is removed only
/// once the store confirms. Dropping the service (or calling
/// [`InboxService::close`]) cancels the live query.
#[derive(Debug)]
pub struct InboxService {
    store: Arc<dyn MessageStore>,
    list: Arc<RwLock<LiveList>>,
    event_bus: EventBus,
    subscription: SubscriptionHandle,
}

impl InboxService {
    /// Opens the store's live query and starts merging snapshots.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the live query cannot be opened.
    pub async fn open(
        store: Arc<dyn MessageStore>,
        event_bus: EventBus,
        strategy: DedupStrategy,
    ) -> Result<Self, ManagerError> {
        let feed = store.watch().await?;
        let list = Arc::new(RwLock::new(LiveList::new(strategy)));

        let task = tokio::spawn(consume(feed, Arc::clone(&list), event_bus.clone()));
        tracing::info!(%strategy, "inbox live query opened");

        Ok(Self {
            store,
            list,
            event_bus,
            subscription: SubscriptionHandle::new(task),
        })
    }

    /// Current messages in first-seen order.
    pub async fn messages(&self) -> Vec<Message> {
        self.list.read().await.messages().to_vec()
    }

    /// Current messages rendered for display.
    pub async fn views(&self) -> Vec<MessageView> {
        self.list
            .read()
            .await
            .messages()
            .iter()
            .map(Message::view)
            .collect()
    }

    /// Number of messages in the local view.
    pub async fn len(&self) -> usize {
        self.list.read().await.len()
    }

    /// Returns `true` if the local view is empty.
    pub async fn is_empty(&self) -> bool {
        self.list.read().await.is_empty()
    }

    /// Deletes a message from the store, then from the local view.
    ///
    /// Returns the removed local entry, or `None` if the store accepted
    /// the delete but the id was not in the local view.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete is rejected; the local
    /// view is left unchanged in that case.
    pub async fn delete(&self, id: &MessageId) -> Result<Option<Message>, ManagerError> {
        if let Err(e) = self.store.delete(id).await {
            tracing::warn!(%id, error = %e, "message delete failed");
            self.event_bus.notify(Notice::error(MESSAGE_DELETE_FAILED));
            return Err(e);
        }

        let removed = self.list.write().await.remove(id);
        if removed.is_some() {
            self.event_bus.publish(ManagerEvent::MessageRemoved {
                message_id: id.to_string(),
                timestamp: Utc::now(),
            });
        }
        self.event_bus.notify(Notice::info(MESSAGE_DELETED));
        tracing::info!(%id, local = removed.is_some(), "message deleted");
        Ok(removed)
    }

    /// Returns `true` while the live query is being consumed.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.subscription.is_active()
    }

    /// Cancels the live query. The local list keeps its last state.
    pub fn close(&self) {
        self.subscription.cancel();
        tracing::info!("inbox live query closed");
    }
}

async fn consume(mut feed: SnapshotFeed, list: Arc<RwLock<LiveList>>, event_bus: EventBus) {
    while let Some(event) = feed.recv().await {
        let outcome = list.write().await.apply(event);
        match outcome {
            ApplyOutcome::Merged { appended } => {
                if !appended.is_empty() {
                    tracing::debug!(count = appended.len(), "messages appended");
                }
                for message in appended {
                    event_bus.publish(ManagerEvent::MessageAppended {
                        message: message.view(),
                        timestamp: Utc::now(),
                    });
                }
            }
            ApplyOutcome::Failed { reason } => {
                tracing::warn!(%reason, "messages live query reported an error");
                event_bus.notify(Notice::error(SUBSCRIPTION_FAILED));
            }
        }
    }
    tracing::debug!("messages feed ended");
}
