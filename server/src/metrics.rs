use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct TicketMetricsSnapshot {
    pub purchases: u64,
    pub reveals: u64,
    pub claims: u64,
    pub prizes_paid_cents: u64,
    pub rejected_ops: u64,
    pub broadcast_lagged: u64,
}

/// Operation counters for the ticket service.
///
/// Counters only move forward; the snapshot is a point-in-time read and
/// makes no cross-counter consistency promise.
#[derive(Default)]
pub struct TicketMetrics {
    purchases: AtomicU64,
    reveals: AtomicU64,
    claims: AtomicU64,
    prizes_paid_cents: AtomicU64,
    rejected_ops: AtomicU64,
    broadcast_lagged: AtomicU64,
}

impl TicketMetrics {
    pub fn inc_purchase(&self) {
        self.purchases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reveal(&self) {
        self.reveals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_claim(&self, prize_cents: u64) {
        self.claims.fetch_add(1, Ordering::Relaxed);
        self.prizes_paid_cents
            .fetch_add(prize_cents, Ordering::Relaxed);
    }

    pub fn inc_rejected(&self) {
        self.rejected_ops.fetch_add(1, Ordering::Relaxed);
    }

    /// Wallet updates dropped by the broadcast channel; the feed reports
    /// them in batches, one count per lag event.
    pub fn add_broadcast_lagged(&self, skipped: u64) {
        self.broadcast_lagged.fetch_add(skipped, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TicketMetricsSnapshot {
        TicketMetricsSnapshot {
            purchases: self.purchases.load(Ordering::Relaxed),
            reveals: self.reveals.load(Ordering::Relaxed),
            claims: self.claims.load(Ordering::Relaxed),
            prizes_paid_cents: self.prizes_paid_cents.load(Ordering::Relaxed),
            rejected_ops: self.rejected_ops.load(Ordering::Relaxed),
            broadcast_lagged: self.broadcast_lagged.load(Ordering::Relaxed),
        }
    }
}
