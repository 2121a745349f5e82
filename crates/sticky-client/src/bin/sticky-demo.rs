//! # sticky-demo
//!
//! Runs a note board against an in-process network: two peers leave notes
//! for Alice, Alice sends one back, a live note arrives, one note is hidden
//! and the composed board is printed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::sync::broadcast;
use tracing::info;

use sticky_client::{
    follow_identity, init_tracing, BoardEvent, ClientConfig, IdentityProvider, NoteComposer,
    NoteDraft, SortMode, StreamAggregator,
};
use sticky_net::{MemoryNetwork, MessagingClient};
use sticky_shared::constants::{APP_NAME, COLOR_OPTIONS};
use sticky_shared::{format_address, Note, NoteMetadata, NotePayload, NoteSize};
use sticky_store::shared;

const ALICE: &str = "0xa11ce00000000000000000000000000000000001";
const BOB: &str = "0xb0b0000000000000000000000000000000000002";
const CAROL: &str = "0xca20100000000000000000000000000000000003";

fn payload(content: &str, color: &str, size: NoteSize) -> anyhow::Result<String> {
    let payload = NotePayload {
        content: content.to_string(),
        metadata: NoteMetadata {
            color: color.to_string(),
            size,
        },
    };
    Ok(payload.encode()?)
}

async fn wait_for(
    events: &mut broadcast::Receiver<BoardEvent>,
    matches: impl Fn(&BoardEvent) -> bool,
) -> anyhow::Result<BoardEvent> {
    let wait = async {
        loop {
            let event = events.recv().await?;
            if matches(&event) {
                return Ok::<_, broadcast::error::RecvError>(event);
            }
        }
    };
    Ok(tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .context("timed out waiting for board event")??)
}

fn print_board(title: &str, notes: &[Note]) {
    println!("\n{title} ({} notes)", notes.len());
    for note in notes {
        println!(
            "  [{} {:<6}] {}  {}",
            note.metadata.color,
            note.metadata.size.as_str(),
            format_address(&note.sender_identity),
            note.content
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Tracing and configuration
    // -----------------------------------------------------------------------
    init_tracing();
    info!("Starting {} demo v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let db = config.open_database().context("failed to open database")?;
    info!(path = ?db.path(), "Database ready");
    let kv = shared(db);

    // -----------------------------------------------------------------------
    // 2. Network with some history
    // -----------------------------------------------------------------------
    let network = MemoryNetwork::new();
    let bob = network.client(BOB);
    let carol = network.client(CAROL);

    bob.send(ALICE, payload("Buy milk on the way home", "#ff8787", NoteSize::Small)?)
        .await?;
    carol
        .send(ALICE, payload("Standup moved to 10:30", "#69db7c", NoteSize::Large)?)
        .await?;
    bob.send(ALICE, r#"{"content":"Bare note, default look"}"#.to_string())
        .await?;

    // -----------------------------------------------------------------------
    // 3. Board driven by the active account
    // -----------------------------------------------------------------------
    let messaging: Arc<dyn MessagingClient> = Arc::new(network.client(ALICE));
    let aggregator = Arc::new(StreamAggregator::new(messaging.clone(), kv, &config));
    let composer = NoteComposer::new(messaging, aggregator.clone());
    let mut events = aggregator.subscribe_events();

    let provider = IdentityProvider::new();
    let follower = follow_identity(aggregator.clone(), provider.watch());
    provider.connect(ALICE);

    if let BoardEvent::Bootstrapped { count } =
        wait_for(&mut events, |e| matches!(e, BoardEvent::Bootstrapped { .. })).await?
    {
        info!(count, "Board loaded");
    }

    // -----------------------------------------------------------------------
    // 4. Send, receive, hide
    // -----------------------------------------------------------------------
    let draft = NoteDraft::new("Thanks, will do!", BOB).with_color(COLOR_OPTIONS[2].1);
    let Some(sent) = composer.send_note(draft).await? else {
        bail!("no active account");
    };
    info!(msg_id = %sent.id, "Reply sent");

    let live = carol
        .send(ALICE, payload("Live: lunch at noon?", "#da77f2", NoteSize::Medium)?)
        .await?;
    let live_id = live.id.clone();
    wait_for(&mut events, |e| {
        matches!(e, BoardEvent::NoteUpserted { id } if *id == live_id)
    })
    .await?;

    print_board("Board", &aggregator.compose(None, config.default_sort));

    let hidden = aggregator
        .notes()
        .into_iter()
        .find(|note| note.sender_identity == CAROL && note.id != live.id);
    if let Some(note) = hidden {
        aggregator.hide(&note.id)?;
        info!(note = %note.id, "Hid standup note");
    }

    print_board("After hiding", &aggregator.compose(None, SortMode::Size));
    print_board("Search \"milk\"", &aggregator.compose(Some("milk"), SortMode::Newest));
    print_board("Search \"0xb0b0\"", &aggregator.compose(Some("0xb0b0"), SortMode::Oldest));

    // -----------------------------------------------------------------------
    // 5. Shutdown
    // -----------------------------------------------------------------------
    provider.disconnect();
    drop(provider);
    follower.await?;
    info!("Demo finished");

    Ok(())
}
