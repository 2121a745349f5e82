//! Sending new notes.

use std::sync::Arc;

use tracing::{debug, info};

use sticky_net::MessagingClient;
use sticky_shared::{is_valid_address, NoteMetadata, NotePayload, NoteSize, RawMessage};

use crate::aggregator::StreamAggregator;
use crate::error::ComposeError;

/// A note being written, before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub content: String,
    pub recipient: String,
    pub metadata: NoteMetadata,
}

impl NoteDraft {
    pub fn new(content: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            recipient: recipient.into(),
            metadata: NoteMetadata::draft_default(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.metadata.color = color.into();
        self
    }

    pub fn with_size(mut self, size: NoteSize) -> Self {
        self.metadata.size = size;
        self
    }
}

pub struct NoteComposer {
    messaging: Arc<dyn MessagingClient>,
    aggregator: Arc<StreamAggregator>,
}

impl NoteComposer {
    pub fn new(messaging: Arc<dyn MessagingClient>, aggregator: Arc<StreamAggregator>) -> Self {
        Self {
            messaging,
            aggregator,
        }
    }

    /// Send `draft` to its recipient and refresh the board.
    ///
    /// Returns `Ok(None)` without sending when no account is active.
    pub async fn send_note(&self, draft: NoteDraft) -> Result<Option<RawMessage>, ComposeError> {
        if self.aggregator.identity().is_none() {
            debug!("No active identity, note not sent");
            return Ok(None);
        }

        let content = draft.content.trim();
        if content.is_empty() {
            return Err(ComposeError::EmptyContent);
        }
        if !is_valid_address(&draft.recipient) {
            return Err(ComposeError::InvalidRecipient(draft.recipient));
        }

        let payload = NotePayload {
            content: content.to_string(),
            metadata: draft.metadata,
        }
        .encode()?;

        let sent = self.messaging.send(&draft.recipient, payload).await?;
        info!(msg_id = %sent.id, recipient = %draft.recipient, "Note sent");

        self.aggregator.refresh().await;
        Ok(Some(sent))
    }
}
