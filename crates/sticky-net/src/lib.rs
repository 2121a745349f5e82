// Messaging capability consumed by the note board, source discovery, and an
// in-process network used by tests and the demo.

pub mod discovery;
pub mod error;
pub mod memory;
pub mod messaging;

pub use discovery::SourceDiscovery;
pub use error::MessagingError;
pub use memory::{MemoryClient, MemoryNetwork};
pub use messaging::{MessageStream, MessagingClient, Source};
