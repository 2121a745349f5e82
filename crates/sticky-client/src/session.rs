//! Active-account tracking.
//!
//! [`IdentityProvider`] publishes the currently connected account (or none)
//! on a watch channel. [`follow_identity`] keeps a [`StreamAggregator`] in
//! step with it: a connect initializes the board, a disconnect disposes it.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::aggregator::StreamAggregator;

/// Source of the active account.
#[derive(Debug)]
pub struct IdentityProvider {
    tx: watch::Sender<Option<String>>,
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn connect(&self, identity: &str) {
        info!(identity = %identity, "Account connected");
        self.tx.send_replace(Some(identity.to_string()));
    }

    pub fn disconnect(&self) {
        if self.tx.send_replace(None).is_some() {
            info!("Account disconnected");
        }
    }

    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn watch(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

/// Drive `aggregator` from identity changes until the provider is dropped.
///
/// The current value is applied immediately. When the channel closes the
/// board is disposed and the task ends.
pub fn follow_identity(
    aggregator: Arc<StreamAggregator>,
    mut identity: watch::Receiver<Option<String>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let current = identity.borrow_and_update().clone();
            match current {
                Some(account) => {
                    if let Err(e) = aggregator.init(&account).await {
                        error!(identity = %account, error = %e, "Failed to activate note board");
                    }
                }
                None => aggregator.dispose().await,
            }

            if identity.changed().await.is_err() {
                debug!("Identity source closed");
                break;
            }
        }

        aggregator.dispose().await;
    })
}
