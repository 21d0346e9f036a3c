//! Per-connection subscription manager.
//!
//! Tracks which event topics a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::Topic;

/// Manages the set of topic subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed topics. If `subscribe_all` is true, this set is ignored.
    topics: HashSet<Topic>,
    /// Whether the client subscribes to all topics (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the subscription set.
    pub fn subscribe(&mut self, topics: &[Topic], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.topics.extend(topics.iter().copied());
    }

    /// Removes topics from the subscription set. Also clears the wildcard
    /// when `wildcard` is set.
    pub fn unsubscribe(&mut self, topics: &[Topic], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for topic in topics {
            self.topics.remove(topic);
        }
    }

    /// Returns `true` if the given topic matches the subscription filter.
    #[must_use]
    pub fn matches(&self, topic: Topic) -> bool {
        self.subscribe_all || self.topics.contains(&topic)
    }

    /// Explicitly subscribed topics, sorted by name.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.topics.iter().copied().collect();
        topics.sort_by_key(|t| t.as_str());
        topics
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

/// Splits raw topic names into known topics and a wildcard flag.
/// Unknown names are returned separately.
#[must_use]
pub fn parse_topics(raw: &[String]) -> (Vec<Topic>, bool, Vec<String>) {
    let mut topics = Vec::new();
    let mut wildcard = false;
    let mut unknown = Vec::new();
    for name in raw {
        if name == "*" {
            wildcard = true;
        } else if let Ok(topic) = name.parse::<Topic>() {
            topics.push(topic);
        } else {
            unknown.push(name.clone());
        }
    }
    (topics, wildcard, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(Topic::Inbox));
    }

    #[test]
    fn subscribe_specific_topic() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[Topic::Inbox], false);
        assert!(mgr.matches(Topic::Inbox));
        assert!(!mgr.matches(Topic::Books));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        for topic in Topic::ALL {
            assert!(mgr.matches(topic));
        }
        mgr.unsubscribe(&[], true);
        assert!(!mgr.matches(Topic::Notices));
    }

    #[test]
    fn unsubscribe_removes_topic() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[Topic::Inbox, Topic::Notices], false);
        mgr.unsubscribe(&[Topic::Inbox], false);
        assert_eq!(mgr.topics(), vec![Topic::Notices]);
    }

    #[test]
    fn parse_topics_separates_unknown() {
        let raw = vec!["inbox".to_string(), "*".to_string(), "pools".to_string()];
        let (topics, wildcard, unknown) = parse_topics(&raw);
        assert_eq!(topics, vec![Topic::Inbox]);
        assert!(wildcard);
        assert_eq!(unknown, vec!["pools".to_string()]);
    }
}
