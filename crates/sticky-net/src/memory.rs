//! In-process messaging network.
//!
//! Conversations live in a shared map keyed by the unordered pair of member
//! addresses. Sending appends to the conversation history and fans the
//! message out to every live subscriber over an unbounded mpsc channel.
//! Failure switches let tests break discovery, history or subscription for a
//! single conversation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use sticky_shared::{is_valid_address, RawMessage};

use crate::error::MessagingError;
use crate::messaging::{MessageStream, MessagingClient, Source};

type Subscriber = mpsc::UnboundedSender<Result<RawMessage, MessagingError>>;

/// Shared state of the network. Clones see the same conversations.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    inner: Arc<Mutex<NetworkInner>>,
}

#[derive(Default)]
struct NetworkInner {
    conversations: Vec<Conversation>,
    failing_discovery: HashSet<String>,
    failing_history: HashSet<String>,
    failing_subscribe: HashSet<String>,
}

struct Conversation {
    topic: String,
    members: [String; 2],
    history: Vec<RawMessage>,
    subscribers: Vec<Subscriber>,
}

impl Conversation {
    fn peer_of(&self, identity: &str) -> &str {
        self.members
            .iter()
            .find(|m| !m.eq_ignore_ascii_case(identity))
            .unwrap_or(&self.members[0])
    }

    fn includes(&self, identity: &str) -> bool {
        self.members.iter().any(|m| m.eq_ignore_ascii_case(identity))
    }
}

impl NetworkInner {
    fn conversation_mut(&mut self, a: &str, b: &str) -> &mut Conversation {
        let topic = topic_for(a, b);
        let index = match self.conversations.iter().position(|c| c.topic == topic) {
            Some(i) => i,
            None => {
                debug!(topic = %topic, "Opening conversation");
                self.conversations.push(Conversation {
                    topic,
                    members: [a.to_string(), b.to_string()],
                    history: Vec::new(),
                    subscribers: Vec::new(),
                });
                self.conversations.len() - 1
            }
        };
        &mut self.conversations[index]
    }

    fn deliver(&mut self, a: &str, b: &str, message: RawMessage) {
        let conversation = self.conversation_mut(a, b);
        conversation.history.push(message.clone());
        conversation
            .subscribers
            .retain(|tx| tx.send(Ok(message.clone())).is_ok());
        debug!(
            topic = %conversation.topic,
            msg_id = %message.id,
            subscribers = conversation.subscribers.len(),
            "Delivered message"
        );
    }
}

/// Conversation handle for the pair `a`, `b` (order and case insensitive).
pub fn topic_for(a: &str, b: &str) -> String {
    let mut pair = [a.to_ascii_lowercase(), b.to_ascii_lowercase()];
    pair.sort();
    format!("dm:{}:{}", pair[0], pair[1])
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client sending as `identity`.
    pub fn client(&self, identity: &str) -> MemoryClient {
        MemoryClient {
            network: self.clone(),
            identity: identity.to_string(),
        }
    }

    /// Deliver an already-built message between `a` and `b`. Re-injecting a
    /// message with a known id models a duplicate delivery by the transport.
    pub fn inject(&self, a: &str, b: &str, message: RawMessage) {
        if let Ok(mut inner) = self.lock() {
            inner.deliver(a, b, message);
        }
    }

    pub fn fail_discovery(&self, identity: &str, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            toggle(&mut inner.failing_discovery, identity.to_ascii_lowercase(), fail);
        }
    }

    pub fn fail_history(&self, a: &str, b: &str, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            toggle(&mut inner.failing_history, topic_for(a, b), fail);
        }
    }

    pub fn fail_subscribe(&self, a: &str, b: &str, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            toggle(&mut inner.failing_subscribe, topic_for(a, b), fail);
        }
    }

    /// Number of open live feeds on the conversation between `a` and `b`.
    pub fn subscriber_count(&self, a: &str, b: &str) -> usize {
        let topic = topic_for(a, b);
        self.lock()
            .ok()
            .and_then(|inner| {
                inner
                    .conversations
                    .iter()
                    .find(|c| c.topic == topic)
                    .map(|c| c.subscribers.iter().filter(|tx| !tx.is_closed()).count())
            })
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, NetworkInner>, MessagingError> {
        self.inner
            .lock()
            .map_err(|_| MessagingError::Transport("network state poisoned".into()))
    }
}

fn toggle(set: &mut HashSet<String>, key: String, on: bool) {
    if on {
        set.insert(key);
    } else {
        set.remove(&key);
    }
}

/// [`MessagingClient`] over a [`MemoryNetwork`], sending as one account.
#[derive(Clone)]
pub struct MemoryClient {
    network: MemoryNetwork,
    identity: String,
}

impl MemoryClient {
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

#[async_trait]
impl MessagingClient for MemoryClient {
    async fn list_sources(&self, identity: &str) -> Result<Vec<Source>, MessagingError> {
        let inner = self.network.lock()?;
        if inner.failing_discovery.contains(&identity.to_ascii_lowercase()) {
            return Err(MessagingError::Transport("conversation listing failed".into()));
        }

        Ok(inner
            .conversations
            .iter()
            .filter(|c| c.includes(identity))
            .map(|c| Source::new(c.topic.clone(), c.peer_of(identity)))
            .collect())
    }

    async fn fetch_history(&self, source: &Source) -> Result<Vec<RawMessage>, MessagingError> {
        let inner = self.network.lock()?;
        if inner.failing_history.contains(&source.topic) {
            return Err(MessagingError::Transport(format!(
                "history fetch failed for {}",
                source.topic
            )));
        }

        inner
            .conversations
            .iter()
            .find(|c| c.topic == source.topic)
            .map(|c| c.history.clone())
            .ok_or_else(|| MessagingError::UnknownSource(source.topic.clone()))
    }

    async fn subscribe(&self, source: &Source) -> Result<MessageStream, MessagingError> {
        let mut inner = self.network.lock()?;
        if inner.failing_subscribe.contains(&source.topic) {
            return Err(MessagingError::Transport(format!(
                "subscription failed for {}",
                source.topic
            )));
        }

        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.topic == source.topic)
            .ok_or_else(|| MessagingError::UnknownSource(source.topic.clone()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        conversation.subscribers.push(tx);
        debug!(topic = %source.topic, "Live subscription opened");

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });
        Ok(stream.boxed())
    }

    async fn send(&self, destination: &str, payload: String) -> Result<RawMessage, MessagingError> {
        if !is_valid_address(destination) {
            return Err(MessagingError::InvalidRecipient(destination.to_string()));
        }

        let message = RawMessage {
            id: Uuid::new_v4().to_string(),
            sender: self.identity.clone(),
            sent_at: Utc::now(),
            payload,
        };

        self.network
            .lock()?
            .deliver(&self.identity, destination, message.clone());
        Ok(message)
    }
}
