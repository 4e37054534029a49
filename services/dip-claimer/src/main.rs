//! DIP reward claimer
//!
//! Long-running process that:
//! 1. Loads accounts (`email:password`) and index-aligned proxies
//! 2. Every round, signs each account in when its token has expired
//! 3. Claims the DIP reward for every account whose 24h cooldown is over
//! 4. Writes each round's output in account order, then sleeps

mod config;
mod service;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use claim_runner::{LOG_QUEUE_CAPACITY, LogQueue, RoundRunner, TracingSink};
use securitylabs_api::{HeaderProfile, HttpConnector};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{CONFIG_FILE, Config, LogFormat};
use crate::service::{DriverAction, DriverEvent, DriverState, handle_event};

/// Upper bound on flushing queued output at shutdown
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_default(Path::new(CONFIG_FILE))
        .with_context(|| format!("failed to load config from {CONFIG_FILE}"))?;

    init_tracing(config.logging.format);
    info!(
        base_url = %config.api.base_url,
        accounts = %config.files.accounts.display(),
        proxies = %config.files.proxies.display(),
        interval_secs = config.schedule.interval_secs,
        "starting dip-claimer"
    );

    let profile = HeaderProfile::for_base_url(&config.api.base_url)
        .context("failed to build request headers")?;
    info!(
        host = ?profile.headers().get("host"),
        content_length = profile.content_length(),
        "request header profile ready"
    );

    let accounts = claim_runner::load_accounts(&config.files.accounts)
        .await
        .context("failed to load accounts")?;
    let proxies = claim_runner::load_proxies(&config.files.proxies)
        .await
        .context("failed to load proxies")?;
    info!(
        accounts = accounts.len(),
        proxies = proxies.len(),
        "inputs loaded"
    );

    let (queue, worker) = LogQueue::spawn(LOG_QUEUE_CAPACITY, TracingSink);
    if accounts.is_empty() {
        queue.push("no accounts to process").await;
    }

    let interval = config.schedule.interval();
    let connector = HttpConnector::new(config.api.base_url.clone(), profile);
    let mut runner = RoundRunner::new(accounts, proxies, connector, queue);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let (mut state, mut action) = handle_event(
        DriverState::Starting,
        DriverEvent::AccountsLoaded {
            count: runner.len(),
        },
        interval,
    );

    loop {
        let event = match action {
            DriverAction::RunRound { round } => {
                tokio::select! {
                    _ = runner.run_round(round) => DriverEvent::RoundCompleted,
                    _ = &mut shutdown => DriverEvent::ShutdownSignal,
                }
            }
            DriverAction::Sleep { delay } => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => DriverEvent::WaitElapsed,
                    _ = &mut shutdown => DriverEvent::ShutdownSignal,
                }
            }
            DriverAction::Shutdown => break,
            DriverAction::None => {
                error!(?state, "driver has nothing to do, stopping");
                break;
            }
        };
        (state, action) = handle_event(state, event, interval);
    }

    // Dropping the last producer lets the consumer drain and finish
    drop(runner);
    match tokio::time::timeout(OUTPUT_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "output consumer failed"),
        Err(_) => error!("output queue did not drain in time"),
    }

    info!("shutdown complete");
    Ok(())
}

/// Initialize tracing with LOG_LEVEL / RUST_LOG support.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for SIGTERM or SIGINT for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
