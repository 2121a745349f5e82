use thiserror::Error;

/// Reasons a raw message does not become a [`Note`](crate::note::Note).
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Payload has no string `content` field")]
    MissingContent,
}
