use thiserror::Error;

use sticky_net::MessagingError;
use sticky_store::StoreError;

/// Errors surfaced by the note board.
///
/// Decode and per-conversation failures never reach the caller; they are
/// logged where they happen.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The hidden-note overlay could not be loaded or written. A failed hide
    /// leaves the board unchanged and can be retried.
    #[error("Hidden-note store error: {0}")]
    Persistence(#[from] StoreError),
}

/// Reasons a drafted note was not sent.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Note content is empty")]
    EmptyContent,

    #[error("Please enter a valid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Failed to encode note: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to send note: {0}")]
    Send(#[from] MessagingError),
}
