//! The messaging capability the note board consumes.
//!
//! Implementations wrap a concrete network client. Only `list_sources`,
//! `fetch_history` and `subscribe` are used by aggregation; `send` is used
//! when composing a note.

use std::fmt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;

use sticky_shared::{format_address, RawMessage};

use crate::error::MessagingError;

/// Live feed of one conversation. Lazy and not restartable; it ends only when
/// the network closes it or the consumer drops it.
pub type MessageStream = BoxStream<'static, Result<RawMessage, MessagingError>>;

/// One peer-to-peer conversation visible to the current account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Network handle for the conversation, opaque to callers.
    pub topic: String,
    /// Address of the counterpart.
    pub peer_address: String,
}

impl Source {
    pub fn new(topic: impl Into<String>, peer_address: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            peer_address: peer_address.into(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_address(&self.peer_address))
    }
}

#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Conversations `identity` takes part in, in the network's listing order.
    async fn list_sources(&self, identity: &str) -> Result<Vec<Source>, MessagingError>;

    /// Every message stored for the conversation.
    async fn fetch_history(&self, source: &Source) -> Result<Vec<RawMessage>, MessagingError>;

    /// Open a live feed of messages arriving from now on.
    async fn subscribe(&self, source: &Source) -> Result<MessageStream, MessagingError>;

    /// Send `payload` to `destination`, opening a conversation if needed.
    async fn send(&self, destination: &str, payload: String) -> Result<RawMessage, MessagingError>;
}
