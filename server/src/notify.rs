//! Best-effort side channels: wallet-update broadcast and purchase receipts.
//!
//! Both fire after the storage transaction commits and never affect the
//! operation result; a full or closed channel is logged and dropped.

use crate::metrics::TicketMetrics;
use instawin_types::api::{PurchaseReceipt, WalletUpdate};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

/// Consumer seam for purchase receipts (email, push, in-app inbox).
pub trait NotificationSink: Send + Sync {
    fn purchase_receipt(&self, receipt: &PurchaseReceipt);
}

/// Default sink: one structured log line per receipt, with an optional
/// forward to an in-process consumer.
pub struct LogNotifications {
    forward: Option<mpsc::Sender<PurchaseReceipt>>,
}

impl LogNotifications {
    pub fn new() -> Self {
        Self { forward: None }
    }

    pub fn with_forward(forward: mpsc::Sender<PurchaseReceipt>) -> Self {
        Self {
            forward: Some(forward),
        }
    }
}

impl Default for LogNotifications {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for LogNotifications {
    fn purchase_receipt(&self, receipt: &PurchaseReceipt) {
        debug!(
            player_id = receipt.player_id,
            ticket_id = receipt.ticket_id,
            ticket_number = %receipt.ticket_number,
            design = %receipt.design_name,
            cost = %receipt.cost,
            "ticket.purchase_receipt"
        );
        if let Some(forward) = &self.forward {
            if let Err(err) = forward.try_send(receipt.clone()) {
                warn!("Dropping purchase receipt: {err}");
            }
        }
    }
}

/// Fan-out point for committed balance changes.
pub struct WalletBroadcaster {
    sender: broadcast::Sender<WalletUpdate>,
}

impl WalletBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WalletUpdate> {
        self.sender.subscribe()
    }

    /// Subscriber handle that records channel lag in the service metrics.
    pub fn feed(&self, metrics: Arc<TicketMetrics>) -> WalletFeed {
        WalletFeed {
            receiver: self.sender.subscribe(),
            metrics,
        }
    }

    /// Send is best-effort: with no subscribers the update is dropped.
    pub fn publish(&self, update: WalletUpdate) {
        let _ = self.sender.send(update);
    }
}

/// Receiving end of the wallet broadcast. A slow consumer loses the oldest
/// updates; each lag event bumps the `broadcast_lagged` counter and the
/// feed resumes from the newest retained update.
pub struct WalletFeed {
    receiver: broadcast::Receiver<WalletUpdate>,
    metrics: Arc<TicketMetrics>,
}

impl WalletFeed {
    /// Next update, or `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<WalletUpdate> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    self.metrics.add_broadcast_lagged(skipped);
                    warn!(skipped, "wallet feed lagged; dropping oldest updates");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
