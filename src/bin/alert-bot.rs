//! Swingalert alert bot
//!
//! Polls market data, evaluates the configured strategies and pushes alerts to
//! Telegram and/or email. Never places trades.

use clap::Parser;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use swingalert::config::{get_environment, Config};
use swingalert::core::{run_connectivity_test, AlertRuntime, EvaluationCycle};
use swingalert::logging;
use swingalert::services::{NotificationHub, YahooChartProvider};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "alert-bot", version, about = "Notify-only swing trading alerts")]
struct Cli {
    /// Run a single evaluation pass and exit
    #[arg(long, conflicts_with = "test")]
    once: bool,

    /// Send a test message through every configured channel and exit
    #[arg(long)]
    test: bool,

    /// Log messages instead of sending them (same as DRY_RUN=1)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let mut config = Config::from_env()?;
    if cli.dry_run {
        config.dry_run = true;
    }

    info!(
        environment = %get_environment(),
        symbols = ?config.symbols,
        timeframes = ?config.timeframes.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
        strategies = ?config.strategies,
        dry_run = config.dry_run,
        "Starting alert bot"
    );

    let timeout = Duration::from_secs(config.fetch_timeout_seconds);
    let hub = NotificationHub::from_config(&config, timeout)?;
    info!(channels = ?hub.channel_names(), "Notification channels ready");

    if cli.test {
        let report = run_connectivity_test(&hub).await;
        if hub.is_empty() {
            return Err("no notification channel configured".into());
        }
        if !report.all_delivered() {
            let failed: Vec<&str> = report.failures.iter().map(|f| f.channel()).collect();
            error!(channels = ?failed, "Test alert failed");
            return Err(format!("test alert failed on: {}", failed.join(", ")).into());
        }
        info!("Test alert delivered on every channel");
        return Ok(());
    }

    if hub.is_empty() {
        warn!("No notification channel configured, alerts will only be logged");
    }

    let provider = Arc::new(YahooChartProvider::new(&config.data_base_url, timeout)?);
    let cycle = EvaluationCycle::new(&config, provider, hub);
    let mut runtime = AlertRuntime::new(cycle, Duration::from_secs(config.poll_interval_seconds));

    if cli.once {
        runtime.run_once().await;
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            // keep the sender alive so the daemon is not stopped
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    runtime.run_daemon(shutdown_rx).await;
    info!("Alert bot stopped");
    Ok(())
}
