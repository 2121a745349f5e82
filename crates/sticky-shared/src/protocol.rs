use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::DecodeError;
use crate::note::{Note, NoteMetadata};

/// A message as delivered by the messaging network, before decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawMessage {
    /// Network-assigned message id, reused as the note id
    pub id: String,
    /// Sender account address
    pub sender: String,
    /// Timestamp stamped by the sender
    pub sent_at: DateTime<Utc>,
    /// Message body; for notes a JSON-encoded [`NotePayload`]
    pub payload: String,
}

/// Body of a note message on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotePayload {
    pub content: String,
    pub metadata: NoteMetadata,
}

impl NotePayload {
    /// Serialize to the string carried as the message body
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decode a raw message into a [`Note`].
///
/// The payload must be a JSON object with a string `content`. Metadata is
/// filled field by field from [`NoteMetadata::received_default`]; a field of
/// the wrong type or an unknown size counts as absent.
pub fn decode(raw: &RawMessage) -> Result<Note, DecodeError> {
    let value: Value = serde_json::from_str(&raw.payload)?;
    let Value::Object(mut fields) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let content = match fields.remove("content") {
        Some(Value::String(s)) => s,
        _ => return Err(DecodeError::MissingContent),
    };

    let metadata = match fields.remove("metadata") {
        Some(Value::Object(partial)) => complete_metadata(partial),
        _ => NoteMetadata::received_default(),
    };

    Ok(Note {
        id: raw.id.clone(),
        content,
        metadata,
        sender_identity: raw.sender.clone(),
        sent_at: raw.sent_at,
    })
}

/// Decode, logging and discarding anything that is not a note.
pub fn decode_or_skip(raw: &RawMessage) -> Option<Note> {
    match decode(raw) {
        Ok(note) => Some(note),
        Err(e) => {
            warn!(msg_id = %raw.id, sender = %raw.sender, error = %e, "Failed to parse message");
            None
        }
    }
}

fn complete_metadata(mut partial: Map<String, Value>) -> NoteMetadata {
    let mut metadata = NoteMetadata::received_default();
    if let Some(Value::String(color)) = partial.remove("color") {
        metadata.color = color;
    }
    if let Some(size) = partial
        .remove("size")
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
    {
        metadata.size = size;
    }
    metadata
}
