//! Multi-conversation note aggregation.
//!
//! For the active account the aggregator lists every conversation, fetches
//! all histories concurrently, installs them as one newest-first collection
//! and then keeps one live feed task per conversation running. Every feed
//! writes into the same [`AggregateView`] through [`Board::ingest`], which
//! checks the hidden-note overlay and upserts under a single lock. Hiding
//! takes the same lock, so a hide and an arrival for one id never interleave.
//!
//! Each activation bumps a generation counter. Feed tasks carry the
//! generation they were started for and their writes are dropped once it is
//! stale, so an account switch cannot leak notes from the previous account.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use futures::StreamExt;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sticky_net::{MessageStream, MessagingClient, Source, SourceDiscovery};
use sticky_shared::{decode_or_skip, Note};
use sticky_store::{SharedKeyValueStore, TombstoneStore};

use crate::aggregate::{AggregateView, Upsert};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::{emit_event, BoardEvent};
use crate::view::{self, SortMode};

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Everything guarded by the board lock.
#[derive(Default)]
struct Board {
    generation: u64,
    identity: Option<String>,
    tombstones: Option<TombstoneStore>,
    view: AggregateView,
    loading: bool,
}

impl Board {
    fn is_hidden(&self, id: &str) -> bool {
        self.tombstones
            .as_ref()
            .is_some_and(|tombstones| tombstones.is_hidden(id))
    }

    /// Apply one live arrival. `None` when it was dropped.
    fn ingest(&mut self, generation: u64, note: Note) -> Option<Upsert> {
        if generation != self.generation {
            debug!(msg_id = %note.id, "Dropping arrival from a stale feed");
            return None;
        }
        if self.is_hidden(&note.id) {
            debug!(msg_id = %note.id, "Discarding hidden note");
            return None;
        }
        Some(self.view.upsert(note))
    }

    /// Forget the active account and everything loaded for it.
    fn reset(&mut self) {
        self.generation += 1;
        self.identity = None;
        self.tombstones = None;
        self.view.clear();
        self.loading = false;
    }
}

fn lock_board(board: &Mutex<Board>) -> MutexGuard<'_, Board> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live feed tasks of one activation.
struct LiveFeeds {
    cancel: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

// ---------------------------------------------------------------------------
// StreamAggregator
// ---------------------------------------------------------------------------

pub struct StreamAggregator {
    messaging: Arc<dyn MessagingClient>,
    discovery: SourceDiscovery,
    kv: SharedKeyValueStore,
    board: Arc<Mutex<Board>>,
    /// Held for the whole of `init`/`refresh`/`teardown`/`dispose`, which
    /// serializes lifecycle changes.
    live: tokio::sync::Mutex<Option<LiveFeeds>>,
    events: broadcast::Sender<BoardEvent>,
}

impl StreamAggregator {
    pub fn new(
        messaging: Arc<dyn MessagingClient>,
        kv: SharedKeyValueStore,
        config: &ClientConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            discovery: SourceDiscovery::new(messaging.clone()),
            messaging,
            kv,
            board: Arc::new(Mutex::new(Board::default())),
            live: tokio::sync::Mutex::new(None),
            events,
        }
    }

    /// Activate for `identity`.
    ///
    /// Re-initializing with the active account is a no-op. Any other account
    /// first discards the current notes and feeds, then bootstraps from
    /// empty. Fails only when the account's hidden-note set cannot be loaded,
    /// in which case the aggregator is left inactive.
    pub async fn init(&self, identity: &str) -> Result<(), ClientError> {
        let mut live = self.live.lock().await;

        let same_identity = lock_board(&self.board)
            .identity
            .as_deref()
            .is_some_and(|current| current.eq_ignore_ascii_case(identity));
        if same_identity {
            debug!(identity = %identity, "Already active for identity");
            return Ok(());
        }

        self.stop_feeds(&mut live).await;
        self.clear_board();

        let tombstones = TombstoneStore::load(self.kv.clone(), identity)?;

        let generation = {
            let mut board = lock_board(&self.board);
            board.identity = Some(identity.to_string());
            board.tombstones = Some(tombstones);
            board.loading = true;
            board.generation
        };

        info!(identity = %identity, "Note board activated");
        *live = Some(self.bootstrap(identity, generation).await);
        Ok(())
    }

    /// Re-fetch every conversation of the active account and restart the
    /// live feeds. Notes stay visible until the new history is installed.
    pub async fn refresh(&self) {
        let mut live = self.live.lock().await;

        let Some(identity) = self.identity() else {
            debug!("No active identity, refresh skipped");
            return;
        };

        self.stop_feeds(&mut live).await;

        let generation = {
            let mut board = lock_board(&self.board);
            board.generation += 1;
            board.loading = true;
            board.generation
        };

        *live = Some(self.bootstrap(&identity, generation).await);
    }

    /// Stop every live feed, keeping the notes already collected.
    pub async fn teardown(&self) {
        let mut live = self.live.lock().await;
        self.stop_feeds(&mut live).await;
    }

    /// Stop every live feed and forget the active account.
    pub async fn dispose(&self) {
        let mut live = self.live.lock().await;
        self.stop_feeds(&mut live).await;

        let was_active = lock_board(&self.board).identity.is_some();
        self.clear_board();
        if was_active {
            info!("Note board deactivated");
        }
    }

    /// Hide a note for the active account.
    ///
    /// The id is written to the durable overlay first; only then is the note
    /// removed from the board. If the write fails nothing changes and the
    /// error is returned so the caller can retry. Without an active account
    /// this does nothing.
    pub fn hide(&self, id: &str) -> Result<(), ClientError> {
        let removed = {
            let mut board = lock_board(&self.board);
            let Some(tombstones) = board.tombstones.as_mut() else {
                debug!(note = %id, "No active identity, hide ignored");
                return Ok(());
            };
            tombstones.hide(id)?;
            board.view.remove(id)
        };

        info!(note = %id, removed, "Note hidden");
        emit_event(&self.events, BoardEvent::NoteHidden { id: id.to_string() });
        Ok(())
    }

    /// Snapshot of the collection in its canonical order.
    pub fn notes(&self) -> Vec<Note> {
        lock_board(&self.board).view.notes().to_vec()
    }

    /// Filtered and sorted projection, see [`view::compose`].
    pub fn compose(&self, query: Option<&str>, sort: SortMode) -> Vec<Note> {
        view::compose(lock_board(&self.board).view.notes(), query, sort)
    }

    /// Number of visible notes, ignoring any search.
    pub fn len(&self) -> usize {
        lock_board(&self.board).view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a history fetch is in flight.
    pub fn is_loading(&self) -> bool {
        lock_board(&self.board).loading
    }

    pub fn identity(&self) -> Option<String> {
        lock_board(&self.board).identity.clone()
    }

    /// Ids hidden by the active account.
    pub fn hidden_ids(&self) -> BTreeSet<String> {
        lock_board(&self.board)
            .tombstones
            .as_ref()
            .map(|tombstones| tombstones.all_hidden().clone())
            .unwrap_or_default()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    // -- internals --

    async fn bootstrap(&self, identity: &str, generation: u64) -> LiveFeeds {
        let sources = match self.discovery.discover(identity).await {
            Ok(sources) => sources,
            Err(e) => {
                warn!(identity = %identity, error = %e, "Failed to list conversations");
                Vec::new()
            }
        };

        // The feed is opened together with the history so nothing sent while
        // history is loading is missed; overlap is absorbed by the upsert.
        let fetches = sources.iter().map(|source| async move {
            let (history, feed) = tokio::join!(
                self.messaging.fetch_history(source),
                self.messaging.subscribe(source)
            );
            (source, history, feed)
        });
        let results = join_all(fetches).await;

        let mut decoded = Vec::new();
        let mut feeds: Vec<(Source, MessageStream)> = Vec::new();
        for (source, history, feed) in results {
            match history {
                Ok(messages) => {
                    debug!(source = %source, count = messages.len(), "Fetched history");
                    decoded.extend(messages.iter().filter_map(decode_or_skip));
                }
                Err(e) => warn!(source = %source, error = %e, "Failed to fetch history"),
            }
            match feed {
                Ok(stream) => feeds.push((source.clone(), stream)),
                Err(e) => warn!(source = %source, error = %e, "Failed to open live feed"),
            }
        }

        let count = {
            let mut board = lock_board(&self.board);
            if board.generation != generation {
                debug!("Bootstrap superseded, discarding history");
                return LiveFeeds::idle();
            }
            let visible: Vec<Note> = decoded
                .into_iter()
                .filter(|note| !board.is_hidden(&note.id))
                .collect();
            board.view = AggregateView::from_history(visible);
            board.loading = false;
            board.view.len()
        };

        info!(
            sources = sources.len(),
            live = feeds.len(),
            count,
            "Bootstrapped note board"
        );
        emit_event(&self.events, BoardEvent::Bootstrapped { count });

        let (cancel, cancel_rx) = watch::channel(false);
        let handles = feeds
            .into_iter()
            .map(|(source, stream)| {
                tokio::spawn(run_feed(
                    source,
                    stream,
                    generation,
                    self.board.clone(),
                    self.events.clone(),
                    cancel_rx.clone(),
                ))
            })
            .collect();

        LiveFeeds { cancel, handles }
    }

    async fn stop_feeds(&self, live: &mut Option<LiveFeeds>) {
        let Some(feeds) = live.take() else {
            return;
        };

        let _ = feeds.cancel.send(true);
        let count = feeds.handles.len();
        for result in join_all(feeds.handles).await {
            if let Err(e) = result {
                if !e.is_cancelled() {
                    warn!(error = %e, "Live feed task failed");
                }
            }
        }
        debug!(count, "Live feeds stopped");
    }

    fn clear_board(&self) {
        let had_notes = {
            let mut board = lock_board(&self.board);
            let had_notes = board.identity.is_some() || !board.view.is_empty();
            board.reset();
            had_notes
        };
        if had_notes {
            emit_event(&self.events, BoardEvent::Cleared);
        }
    }
}

impl LiveFeeds {
    fn idle() -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            cancel,
            handles: Vec::new(),
        }
    }
}

/// Drain one conversation's live feed into the board until cancelled or the
/// feed ends.
async fn run_feed(
    source: Source,
    mut stream: MessageStream,
    generation: u64,
    board: Arc<Mutex<Board>>,
    events: broadcast::Sender<BoardEvent>,
    mut cancel: watch::Receiver<bool>,
) {
    debug!(source = %source, "Live feed started");

    loop {
        tokio::select! {
            biased;

            _ = cancel.changed() => break,

            item = stream.next() => match item {
                Some(Ok(raw)) => {
                    let Some(note) = decode_or_skip(&raw) else {
                        continue;
                    };
                    let id = note.id.clone();
                    let outcome = lock_board(&board).ingest(generation, note);
                    if let Some(outcome) = outcome {
                        debug!(source = %source, msg_id = %id, ?outcome, "Live note applied");
                        emit_event(&events, BoardEvent::NoteUpserted { id });
                    }
                }
                Some(Err(e)) => warn!(source = %source, error = %e, "Live feed error"),
                None => {
                    info!(source = %source, "Live feed closed by network");
                    break;
                }
            }
        }
    }

    debug!(source = %source, "Live feed stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use sticky_net::MemoryNetwork;
    use sticky_shared::RawMessage;
    use sticky_store::{shared, KeyValueStore, MemoryKeyValueStore};

    const ALICE: &str = "0xa000000000000000000000000000000000000001";
    const BOB: &str = "0xb000000000000000000000000000000000000002";
    const CAROL: &str = "0xc000000000000000000000000000000000000003";

    fn raw(id: &str, sender: &str, secs: i64, content: &str) -> RawMessage {
        RawMessage {
            id: id.into(),
            sender: sender.into(),
            sent_at: Utc.timestamp_opt(secs, 0).unwrap(),
            payload: json!({ "content": content }).to_string(),
        }
    }

    fn aggregator(network: &MemoryNetwork, kv: &MemoryKeyValueStore) -> StreamAggregator {
        StreamAggregator::new(
            Arc::new(network.client(ALICE)),
            shared(kv.clone()),
            &ClientConfig::default(),
        )
    }

    fn ids(notes: &[Note]) -> Vec<String> {
        notes.iter().map(|n| n.id.clone()).collect()
    }

    async fn wait_for_upsert(rx: &mut broadcast::Receiver<BoardEvent>, id: &str) {
        let expected = BoardEvent::NoteUpserted { id: id.to_string() };
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if rx.recv().await.unwrap() == expected {
                    return;
                }
            }
        })
        .await
        .expect("timed out waiting for live note");
    }

    #[tokio::test]
    async fn test_bootstrap_merges_conversations_newest_first() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("b0", BOB, 5, "old"));
        network.inject(ALICE, BOB, raw("b1", BOB, 10, "mid"));
        network.inject(ALICE, CAROL, raw("c1", CAROL, 20, "new"));
        let kv = MemoryKeyValueStore::new();
        let board = aggregator(&network, &kv);
        let mut events = board.subscribe_events();

        board.init(ALICE).await.unwrap();

        assert_eq!(ids(&board.notes()), vec!["c1", "b1", "b0"]);
        assert!(!board.is_loading());
        assert_eq!(board.identity().as_deref(), Some(ALICE));
        assert_eq!(events.recv().await.unwrap(), BoardEvent::Bootstrapped { count: 3 });
    }

    #[tokio::test]
    async fn test_undecodable_messages_are_skipped() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("ok", BOB, 1, "fine"));
        let mut broken = raw("broken", BOB, 2, "");
        broken.payload = "not json".into();
        network.inject(ALICE, BOB, broken);
        let mut no_content = raw("no-content", BOB, 3, "");
        no_content.payload = json!({ "metadata": { "color": "#fff" } }).to_string();
        network.inject(ALICE, BOB, no_content);

        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();

        assert_eq!(ids(&board.notes()), vec!["ok"]);
    }

    #[tokio::test]
    async fn test_live_arrival_goes_to_front() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("recent", BOB, 100, "recent"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();
        let mut events = board.subscribe_events();

        // Older timestamp, but it is the latest activity.
        network.inject(ALICE, BOB, raw("late", BOB, 1, "late"));
        wait_for_upsert(&mut events, "late").await;

        assert_eq!(ids(&board.notes()), vec!["late", "recent"]);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_keeps_one_entry() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("a", BOB, 1, "a"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();
        let mut events = board.subscribe_events();

        network.inject(ALICE, BOB, raw("x", BOB, 2, "x"));
        network.inject(ALICE, BOB, raw("x", BOB, 2, "x"));
        wait_for_upsert(&mut events, "x").await;
        wait_for_upsert(&mut events, "x").await;

        assert_eq!(ids(&board.notes()), vec!["x", "a"]);
    }

    #[tokio::test]
    async fn test_redelivered_note_moves_to_front() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("a", BOB, 1, "draft"));
        network.inject(ALICE, CAROL, raw("b", CAROL, 2, "other"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();
        assert_eq!(ids(&board.notes()), vec!["b", "a"]);
        let mut events = board.subscribe_events();

        network.inject(ALICE, BOB, raw("a", BOB, 3, "edited"));
        wait_for_upsert(&mut events, "a").await;

        let newest = board.compose(None, SortMode::Newest);
        assert_eq!(ids(&newest), vec!["a", "b"]);
        assert_eq!(newest[0].content, "edited");
    }

    #[tokio::test]
    async fn test_hidden_note_stays_hidden() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("n1", BOB, 1, "hide me"));
        network.inject(ALICE, BOB, raw("n2", BOB, 2, "keep me"));
        let kv = MemoryKeyValueStore::new();
        let board = aggregator(&network, &kv);
        board.init(ALICE).await.unwrap();
        let mut events = board.subscribe_events();

        board.hide("n1").unwrap();
        assert_eq!(ids(&board.notes()), vec!["n2"]);
        assert_eq!(
            events.recv().await.unwrap(),
            BoardEvent::NoteHidden { id: "n1".into() }
        );

        // Redelivery of the hidden id is discarded; the sentinel behind it on
        // the same feed proves the redelivery was processed.
        network.inject(ALICE, BOB, raw("n1", BOB, 1, "hide me"));
        network.inject(ALICE, BOB, raw("n3", BOB, 3, "sentinel"));
        wait_for_upsert(&mut events, "n3").await;
        assert_eq!(ids(&board.notes()), vec!["n3", "n2"]);

        // A fresh client on the same storage still hides it.
        board.dispose().await;
        let restarted = aggregator(&network, &kv);
        restarted.init(ALICE).await.unwrap();
        assert_eq!(ids(&restarted.notes()), vec!["n3", "n2"]);
        assert!(restarted.hidden_ids().contains("n1"));
    }

    #[tokio::test]
    async fn test_failed_hide_changes_nothing() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("n1", BOB, 1, "x"));
        let kv = MemoryKeyValueStore::new();
        let board = aggregator(&network, &kv);
        board.init(ALICE).await.unwrap();

        kv.set_fail_writes(true);
        assert!(matches!(board.hide("n1"), Err(ClientError::Persistence(_))));
        assert_eq!(ids(&board.notes()), vec!["n1"]);
        assert!(board.hidden_ids().is_empty());

        kv.set_fail_writes(false);
        board.hide("n1").unwrap();
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_hide_is_per_identity() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("shared", BOB, 1, "x"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());

        board.init(ALICE).await.unwrap();
        board.hide("shared").unwrap();
        assert!(board.is_empty());

        board.init(BOB).await.unwrap();
        assert_eq!(ids(&board.notes()), vec!["shared"]);
        assert!(board.hidden_ids().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_stops_feeds_and_keeps_notes() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("n1", BOB, 1, "x"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();
        assert_eq!(network.subscriber_count(ALICE, BOB), 1);

        board.teardown().await;

        assert_eq!(network.subscriber_count(ALICE, BOB), 0);
        assert_eq!(ids(&board.notes()), vec!["n1"]);
    }

    #[tokio::test]
    async fn test_identity_switch_drops_previous_account() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("ab", BOB, 1, "for alice"));
        network.inject(CAROL, BOB, raw("cb", BOB, 2, "for carol"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();

        board.init(CAROL).await.unwrap();
        assert_eq!(ids(&board.notes()), vec!["cb"]);
        assert_eq!(network.subscriber_count(ALICE, BOB), 0);
        assert_eq!(network.subscriber_count(CAROL, BOB), 1);

        let mut events = board.subscribe_events();
        network.inject(ALICE, BOB, raw("ab2", BOB, 3, "late for alice"));
        network.inject(CAROL, BOB, raw("cb2", BOB, 4, "for carol"));
        wait_for_upsert(&mut events, "cb2").await;
        assert_eq!(ids(&board.notes()), vec!["cb2", "cb"]);
    }

    #[tokio::test]
    async fn test_init_same_identity_is_noop() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("n1", BOB, 1, "x"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());

        board.init(ALICE).await.unwrap();
        board.init(&ALICE.to_uppercase().replacen("0X", "0x", 1)).await.unwrap();

        assert_eq!(network.subscriber_count(ALICE, BOB), 1);
        assert_eq!(board.identity().as_deref(), Some(ALICE));
    }

    #[tokio::test]
    async fn test_refresh_picks_up_new_conversations() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("b1", BOB, 1, "x"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();

        // Not covered by any live feed until a refresh.
        network.inject(ALICE, CAROL, raw("c1", CAROL, 2, "y"));
        assert_eq!(ids(&board.notes()), vec!["b1"]);

        board.refresh().await;

        assert_eq!(ids(&board.notes()), vec!["c1", "b1"]);
        assert_eq!(network.subscriber_count(ALICE, BOB), 1);
        assert_eq!(network.subscriber_count(ALICE, CAROL), 1);
    }

    #[tokio::test]
    async fn test_failing_conversation_is_isolated() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("b1", BOB, 1, "x"));
        network.inject(ALICE, BOB, raw("b2", BOB, 2, "y"));
        network.inject(ALICE, BOB, raw("b3", BOB, 3, "z"));
        network.inject(ALICE, CAROL, raw("c1", CAROL, 4, "lost"));
        network.fail_history(ALICE, CAROL, true);
        network.fail_subscribe(ALICE, BOB, true);
        let board = aggregator(&network, &MemoryKeyValueStore::new());

        board.init(ALICE).await.unwrap();

        assert_eq!(ids(&board.notes()), vec!["b3", "b2", "b1"]);
        assert_eq!(network.subscriber_count(ALICE, BOB), 0);
        assert_eq!(network.subscriber_count(ALICE, CAROL), 1);
    }

    #[tokio::test]
    async fn test_discovery_failure_gives_empty_board() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("b1", BOB, 1, "x"));
        network.fail_discovery(ALICE, true);
        let board = aggregator(&network, &MemoryKeyValueStore::new());

        board.init(ALICE).await.unwrap();

        assert!(board.is_empty());
        assert!(!board.is_loading());
        assert_eq!(board.identity().as_deref(), Some(ALICE));
    }

    #[tokio::test]
    async fn test_corrupt_hidden_set_fails_init() {
        let network = MemoryNetwork::new();
        let mut kv = MemoryKeyValueStore::new();
        kv.set(&format!("{ALICE}:hidden-notes"), "not json").unwrap();
        let board = aggregator(&network, &kv);

        let result = board.init(ALICE).await;

        assert!(matches!(result, Err(ClientError::Persistence(_))));
        assert!(board.identity().is_none());
    }

    #[tokio::test]
    async fn test_without_identity_everything_is_noop() {
        let network = MemoryNetwork::new();
        let board = aggregator(&network, &MemoryKeyValueStore::new());

        board.hide("anything").unwrap();
        board.refresh().await;
        board.teardown().await;

        assert!(board.is_empty());
        assert!(board.identity().is_none());
        assert!(board.hidden_ids().is_empty());
    }

    #[tokio::test]
    async fn test_dispose_clears_board() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("n1", BOB, 1, "x"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();
        let mut events = board.subscribe_events();

        board.dispose().await;

        assert!(board.is_empty());
        assert!(board.identity().is_none());
        assert_eq!(network.subscriber_count(ALICE, BOB), 0);
        assert_eq!(events.recv().await.unwrap(), BoardEvent::Cleared);
    }

    #[tokio::test]
    async fn test_compose_over_board() {
        let network = MemoryNetwork::new();
        network.inject(ALICE, BOB, raw("milk", BOB, 1, "Buy milk"));
        network.inject(ALICE, BOB, raw("mom", BOB, 2, "Call mom"));
        let board = aggregator(&network, &MemoryKeyValueStore::new());
        board.init(ALICE).await.unwrap();

        assert_eq!(ids(&board.compose(Some("MILK"), SortMode::Newest)), vec!["milk"]);
        assert_eq!(ids(&board.compose(None, SortMode::Oldest)), vec!["milk", "mom"]);
        assert_eq!(ids(&board.notes()), vec!["mom", "milk"]);
    }
}
