use anyhow::{bail, Context, Result};
use clap::Parser;
use instawin_server::{Api, App, ServerConfig};
use instawin_types::{PlatformLimits, Sc};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host interface to bind (default: localhost).
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Path to the SQLite database.
    #[arg(long, default_value = "instawin.db")]
    db_path: PathBuf,

    /// Win probability applied to seeded designs (0..=1).
    #[arg(long)]
    win_probability: Option<f64>,

    /// Minimum ticket cost in cents (overrides the platform default).
    #[arg(long)]
    min_bet_cents: Option<u64>,

    /// Maximum ticket cost in cents (overrides the platform default).
    #[arg(long)]
    max_bet_cents: Option<u64>,

    /// Maximum single-ticket payout in cents (overrides the platform default).
    #[arg(long)]
    max_win_cents: Option<u64>,

    /// Gold-coin balance granted at registration, in cents.
    #[arg(long, default_value_t = 500_000)]
    starting_gold_cents: u64,

    /// Sweeps-coin balance granted at registration, in cents.
    #[arg(long, default_value_t = 1_000)]
    starting_sweeps_cents: u64,

    /// Maximum accepted request body size in bytes.
    #[arg(long)]
    http_body_limit_bytes: Option<usize>,
}

fn build_config(args: &Args) -> Result<ServerConfig> {
    let mut config = ServerConfig {
        host: args.host,
        port: args.port,
        db_path: args.db_path.clone(),
        starting_gold: Sc::from_cents(args.starting_gold_cents),
        starting_sweeps: Sc::from_cents(args.starting_sweeps_cents),
        ..ServerConfig::default()
    };

    if let Some(probability) = args.win_probability {
        if !(0.0..=1.0).contains(&probability) {
            bail!("win_probability must be within 0..=1, got {probability}");
        }
        config.win_probability = probability;
    }

    let mut limits = PlatformLimits::default();
    if let Some(cents) = args.min_bet_cents {
        if cents == 0 {
            bail!("min_bet_cents must be positive");
        }
        limits.min_bet = Sc::from_cents(cents);
    }
    if let Some(cents) = args.max_bet_cents {
        limits.max_bet = Sc::from_cents(cents);
    }
    if let Some(cents) = args.max_win_cents {
        limits.max_win = Sc::from_cents(cents);
    }
    if limits.min_bet > limits.max_bet {
        bail!("min_bet_cents must not exceed max_bet_cents");
    }
    config.limits = limits;

    if let Some(limit) = args.http_body_limit_bytes {
        if limit == 0 {
            bail!("http_body_limit_bytes must be positive");
        }
        config.http_body_limit_bytes = limit;
    }

    Ok(config)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = build_config(&args)?;
    let addr = SocketAddr::new(config.host, config.port);

    let app = App::new(config)?;

    // Drain the wallet broadcast so committed balance changes show up in
    // the operator log; a lagging drain is counted, never blocking.
    let mut feed = app.wallet_feed();
    tokio::spawn(async move {
        while let Some(update) = feed.recv().await {
            tracing::debug!(
                player_id = update.player_id,
                gold = %update.gold_coins,
                sweeps = %update.sweeps_coins,
                "wallet.update"
            );
        }
    });

    let router = Api::new(app).router();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "instawin server listening");
    axum::serve(listener, router).await.context("serve http")?;

    Ok(())
}
