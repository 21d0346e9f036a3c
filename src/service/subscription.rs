//! Cancellation handle for a live query consumer.

use tokio::task::JoinHandle;

/// Owns the task that drains one live query.
///
/// Cancelling (or dropping) the handle aborts the task. The task owns the
/// [`crate::domain::SnapshotFeed`], so aborting it drops the feed and the
/// gateway releases its listener.
#[derive(Debug)]
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    /// Wraps a spawned consumer task.
    #[must_use]
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stops the consumer. Idempotent.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns `true` while the consumer task is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancel_stops_task() {
        let handle = SubscriptionHandle::new(tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }));
        assert!(handle.is_active());

        handle.cancel();
        handle.cancel();
        for _ in 0..50 {
            if !handle.is_active() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!handle.is_active());
    }
}
