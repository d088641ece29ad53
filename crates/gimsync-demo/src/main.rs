//! Group state demo binary.
//!
//! # Usage
//!
//! ```bash
//! # Poll the simulated group for 30 seconds
//! gimsync-demo
//!
//! # Faster polling, a flaky backend and debug logs
//! gimsync-demo --poll-interval-ms 250 --outage-every 5 --log-level debug
//! ```

use std::time::Duration;

use clap::Parser;
use gimsync_app::{Driver, EngineConfig, PollConfig, Runtime};
use gimsync_demo::{DemoDriver, SystemEnv};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Group state synchronization demo
#[derive(Parser, Debug)]
#[command(name = "gimsync-demo")]
#[command(about = "Polls a simulated group backend and logs the aggregate")]
#[command(version)]
struct Args {
    /// Delay between group snapshot polls
    #[arg(long, default_value = "1000")]
    poll_interval_ms: u64,

    /// Delay between collection log polls
    #[arg(long, default_value = "30000")]
    collection_interval_ms: u64,

    /// How long to run before disconnecting (Ctrl-C disconnects early)
    #[arg(long, default_value = "30")]
    duration_secs: u64,

    /// Simulated round trip per fetch
    #[arg(long, default_value = "150")]
    latency_ms: u64,

    /// Fail every Nth fetch (0 never fails)
    #[arg(long, default_value = "0")]
    outage_every: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let engine = EngineConfig::default();
    let polling = PollConfig {
        group_data_interval: Duration::from_millis(args.poll_interval_ms),
        collection_log_interval: Duration::from_millis(args.collection_interval_ms),
    };
    let driver = DemoDriver::new()
        .with_latency(Duration::from_millis(args.latency_ms))
        .with_outage_every(args.outage_every)
        .with_xp_drop_ttl(engine.xp_drop_ttl);

    tracing::info!(?polling, "gimsync demo starting");

    let _timer = driver.close_after(Duration::from_secs(args.duration_secs));
    let session = driver.session();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, disconnecting");
            session.close();
        }
    });

    Runtime::new(driver, SystemEnv::new(), engine, polling).run().await?;

    Ok(())
}
