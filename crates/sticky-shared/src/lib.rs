// Note model, payload codec and address rules shared by every sticky crate.

pub mod address;
pub mod constants;
pub mod error;
pub mod note;
pub mod protocol;

pub use address::{format_address, is_valid_address};
pub use error::DecodeError;
pub use note::{Note, NoteMetadata, NoteSize};
pub use protocol::{decode, decode_or_skip, NotePayload, RawMessage};
