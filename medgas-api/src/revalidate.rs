/// Page revalidation signals
///
/// After a successful invoice write the handler announces which rendered
/// paths are now stale. Delivery is fire-and-forget over a
/// `tokio::sync::broadcast` channel: the handler never waits for a
/// listener, and a send with nobody subscribed is not an error.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct Revalidator {
    tx: broadcast::Sender<String>,
}

impl Default for Revalidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Revalidator {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Marks one path as stale
    pub fn revalidate(&self, path: impl Into<String>) {
        let path = path.into();
        match self.tx.send(path.clone()) {
            Ok(listeners) => debug!(path = %path, listeners, "Revalidation signalled"),
            Err(_) => debug!(path = %path, "Revalidation signalled with no listeners"),
        }
    }

    /// The invoice list and the invoice's own page
    pub fn invoice_changed(&self, invoice_id: i32) {
        self.revalidate("/invoices");
        self.revalidate(format!("/invoices/{}", invoice_id));
    }
}

/// Drains revalidation signals into the log until the channel closes
pub async fn log_revalidations(mut rx: broadcast::Receiver<String>) {
    loop {
        match rx.recv().await {
            Ok(path) => info!(path = %path, "Path revalidated"),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(lagged = n, "Revalidation listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
