//! Source discovery.
//!
//! Asks the messaging client for the conversations visible to an account and
//! cleans up the listing: duplicate topics are dropped (first one wins) so
//! that each conversation gets exactly one history fetch and one live feed.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::MessagingError;
use crate::messaging::{MessagingClient, Source};

#[derive(Clone)]
pub struct SourceDiscovery {
    messaging: Arc<dyn MessagingClient>,
}

impl SourceDiscovery {
    pub fn new(messaging: Arc<dyn MessagingClient>) -> Self {
        Self { messaging }
    }

    /// List the conversations of `identity`, preserving the network's order.
    pub async fn discover(&self, identity: &str) -> Result<Vec<Source>, MessagingError> {
        let listed = self.messaging.list_sources(identity).await?;
        let listed_count = listed.len();

        let mut seen = HashSet::new();
        let sources: Vec<Source> = listed
            .into_iter()
            .filter(|source| {
                if seen.insert(source.topic.clone()) {
                    debug!(topic = %source.topic, peer = %source, "Discovered conversation");
                    true
                } else {
                    warn!(topic = %source.topic, "Skipping duplicate conversation");
                    false
                }
            })
            .collect();

        info!(
            identity = %identity,
            listed = listed_count,
            count = sources.len(),
            "Discovered conversations"
        );

        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sticky_shared::RawMessage;

    use crate::memory::MemoryNetwork;
    use crate::messaging::MessageStream;

    const ALICE: &str = "0xa000000000000000000000000000000000000001";
    const BOB: &str = "0xb000000000000000000000000000000000000002";
    const CAROL: &str = "0xc000000000000000000000000000000000000003";

    struct Repeating;

    #[async_trait]
    impl MessagingClient for Repeating {
        async fn list_sources(&self, _identity: &str) -> Result<Vec<Source>, MessagingError> {
            Ok(vec![
                Source::new("t1", BOB),
                Source::new("t2", CAROL),
                Source::new("t1", BOB),
            ])
        }

        async fn fetch_history(&self, _source: &Source) -> Result<Vec<RawMessage>, MessagingError> {
            Ok(Vec::new())
        }

        async fn subscribe(&self, source: &Source) -> Result<MessageStream, MessagingError> {
            Err(MessagingError::UnknownSource(source.topic.clone()))
        }

        async fn send(&self, _destination: &str, _payload: String) -> Result<RawMessage, MessagingError> {
            Err(MessagingError::NotConnected)
        }
    }

    #[tokio::test]
    async fn test_duplicates_are_dropped_in_order() {
        let discovery = SourceDiscovery::new(Arc::new(Repeating));
        let sources = discovery.discover(ALICE).await.unwrap();
        let topics: Vec<&str> = sources.iter().map(|s| s.topic.as_str()).collect();
        assert_eq!(topics, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_lists_memory_conversations() {
        let network = MemoryNetwork::new();
        network.client(ALICE).send(BOB, "{}".into()).await.unwrap();
        network.client(CAROL).send(ALICE, "{}".into()).await.unwrap();

        let discovery = SourceDiscovery::new(Arc::new(network.client(ALICE)));
        let peers: Vec<String> = discovery
            .discover(ALICE)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.peer_address)
            .collect();
        assert_eq!(peers, vec![BOB.to_string(), CAROL.to_string()]);
    }

    #[tokio::test]
    async fn test_discovery_failure_propagates() {
        let network = MemoryNetwork::new();
        network.fail_discovery(ALICE, true);

        let discovery = SourceDiscovery::new(Arc::new(network.client(ALICE)));
        assert!(discovery.discover(ALICE).await.is_err());
    }
}
