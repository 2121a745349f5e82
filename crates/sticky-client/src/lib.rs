//! # sticky-client
//!
//! Client side of Very Sticky: aggregates notes from every conversation of
//! the active account into one board, overlays the account's hidden notes,
//! and offers filtered and sorted views of the result.

pub mod aggregate;
pub mod aggregator;
pub mod composer;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod view;

pub use aggregate::{AggregateView, Upsert};
pub use aggregator::StreamAggregator;
pub use composer::{NoteComposer, NoteDraft};
pub use config::ClientConfig;
pub use error::{ClientError, ComposeError};
pub use events::BoardEvent;
pub use session::{follow_identity, IdentityProvider};
pub use view::{compose, SortMode};

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber (respects `RUST_LOG`).
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("sticky_client=debug,sticky_net=debug,sticky_store=info,warn")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
