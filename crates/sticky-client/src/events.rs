use serde::Serialize;
use tokio::sync::broadcast;

/// Change notifications for a presentation layer; on any of them it re-runs
/// `compose` to refresh what it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    /// History was installed for the active account.
    Bootstrapped { count: usize },
    /// A live arrival was inserted or moved to the front.
    NoteUpserted { id: String },
    NoteHidden { id: String },
    /// All notes were dropped (account switched or signed out).
    Cleared,
}

pub fn emit_event(tx: &broadcast::Sender<BoardEvent>, event: BoardEvent) {
    if let Err(e) = tx.send(event) {
        tracing::trace!(event = ?e.0, "No event subscribers");
    }
}
