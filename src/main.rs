//! `token-ticker` binary: prints the Live Stats panel for one token until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use token_ticker::{
    config::{
        ENV_API_URL, ENV_MAX_IN_FLIGHT, ENV_POLL_INTERVAL_MS, ENV_REQUEST_TIMEOUT_SECS,
        ENV_TOKEN_ADDRESS,
    },
    constants::{
        DEFAULT_TOKEN_ADDRESS, DEXSCREENER_API_URL, MAX_IN_FLIGHT_REQUESTS, POLL_INTERVAL_MS,
        REQUEST_TIMEOUT_SECS,
    },
    LiveStats, MarketDataPoller, PollerConfig, SnapshotStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Live price ticker for a single DexScreener-listed token
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, env = ENV_TOKEN_ADDRESS, default_value = DEFAULT_TOKEN_ADDRESS)]
    token_address: String,

    #[arg(long, env = ENV_API_URL, default_value = DEXSCREENER_API_URL)]
    api_url: String,

    #[arg(long, env = ENV_POLL_INTERVAL_MS, default_value_t = POLL_INTERVAL_MS)]
    interval_ms: u64,

    #[arg(long, env = ENV_REQUEST_TIMEOUT_SECS, default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = ENV_MAX_IN_FLIGHT, default_value_t = MAX_IN_FLIGHT_REQUESTS)]
    max_in_flight: usize,

    /// Fetch a single snapshot, print it and exit
    #[arg(long)]
    once: bool,

    /// Print the change without ANSI colors
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            token_address: self.token_address.clone(),
            api_url: self.api_url.clone(),
            poll_interval: Duration::from_millis(self.interval_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
            max_in_flight: self.max_in_flight,
        }
    }
}

fn render(stats: &LiveStats, color: bool) -> String {
    if color {
        stats.render_colored()
    } else {
        stats.to_string()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.poller_config();
    config.validate().context("invalid ticker configuration")?;
    let color = !args.no_color;

    let poller = MarketDataPoller::new(config).context("failed to build DexScreener client")?;
    info!(token = %poller.config().token_address, "ticker configured");

    if args.once {
        let snapshot = poller
            .fetch_once()
            .await
            .context("failed to fetch token snapshot")?;
        print!("{}", render(&LiveStats::from_snapshot(&snapshot), color));
        return Ok(());
    }

    let store = Arc::new(SnapshotStore::new());
    let sink = store.clone();
    let handle = poller.start(move |snapshot| {
        if sink.update(snapshot) {
            println!("{}", render(&LiveStats::from_snapshot(&snapshot), color));
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    handle.cancel();
    store.dispose();

    let metrics = poller.provider_metrics().await;
    info!(
        total_requests = metrics.total_requests,
        failed_requests = metrics.failed_requests,
        skipped_ticks = metrics.skipped_ticks,
        latency_p50_ms = metrics.latency_p50_ms,
        "ticker stopped"
    );

    Ok(())
}
