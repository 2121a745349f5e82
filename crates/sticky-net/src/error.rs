use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    #[error("Messaging client not connected")]
    NotConnected,

    #[error("Unknown conversation: {0}")]
    UnknownSource(String),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
