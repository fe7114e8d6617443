//! HTTP service for the instant-win ticket platform.
//!
//! The service is deliberately thin: handlers authenticate the player, call
//! one store operation (which runs the whole financial mutation inside a
//! SQLite transaction), then fan the result out to the wallet broadcaster
//! and notification sink. Nothing outside the store mutates balances.

use anyhow::Context;
use instawin_engine::TicketRng;
use instawin_types::api::WalletBalances;
use instawin_types::{PlatformLimits, Sc};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

pub mod api;
mod metrics;
mod notify;
mod store;

pub use api::Api;
pub use metrics::{TicketMetrics, TicketMetricsSnapshot};
pub use notify::{LogNotifications, NotificationSink, WalletBroadcaster, WalletFeed};
pub use store::{ClaimOutcome, PurchaseOutcome, Store};

const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;
const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub win_probability: f64,
    pub limits: PlatformLimits,
    pub starting_gold: Sc,
    pub starting_sweeps: Sc,
    pub http_body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            db_path: PathBuf::from("instawin.db"),
            win_probability: instawin_types::DEFAULT_WIN_PROBABILITY,
            limits: PlatformLimits::default(),
            starting_gold: Sc::from_cents(500_000),
            starting_sweeps: Sc::from_cents(1_000),
            http_body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

pub struct App {
    pub config: ServerConfig,
    pub store: Store,
    pub broadcaster: WalletBroadcaster,
    pub notifications: Box<dyn NotificationSink>,
    pub metrics: Arc<TicketMetrics>,
}

impl App {
    pub fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        Self::with_sink(config, Box::new(LogNotifications::new()))
    }

    pub fn with_sink(
        config: ServerConfig,
        notifications: Box<dyn NotificationSink>,
    ) -> anyhow::Result<Arc<Self>> {
        let store = Store::open(
            &config.db_path,
            config.limits,
            WalletBalances {
                gold_coins: config.starting_gold,
                sweeps_coins: config.starting_sweeps,
            },
            TicketRng::from_entropy(),
        )
        .context("open ticket store")?;
        store
            .seed_default_designs(config.win_probability)
            .context("seed default designs")?;

        Ok(Arc::new(Self {
            config,
            store,
            broadcaster: WalletBroadcaster::new(BROADCAST_CAPACITY),
            notifications,
            metrics: Arc::new(TicketMetrics::default()),
        }))
    }

    /// Wallet-update subscriber; lag is recorded in the service metrics.
    pub fn wallet_feed(&self) -> WalletFeed {
        self.broadcaster.feed(Arc::clone(&self.metrics))
    }
}
