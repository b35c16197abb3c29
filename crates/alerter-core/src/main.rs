//! Alerter daemon
//!
//! Watches the missed blocks of one validator and reports long streaks.

use std::process::ExitCode;

use alerter::config::LogFormat;
use alerter::prelude::*;
use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine, the variables may come from the environment
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.logging.format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let pool = PostgresPool::new(&config.database)
        .await
        .context("connecting to the database")?;
    pool.health_check()
        .await
        .context("database health check")?;
    info!(
        host = %config.database.host,
        database = %config.database.name,
        "Database connection healthy"
    );

    let notifier = SentryNotifier::new(&config.alerting.dsn).context("setting up Sentry")?;

    let mut monitor = MissMonitor::new(
        MissRepository::new(&pool),
        notifier,
        config.monitor.address.clone(),
        config.monitor.miss_threshold,
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Unable to listen for the interrupt signal");
            return;
        }
        info!("Interrupt received, shutting down...");
        signal_token.cancel();
    });

    Scheduler::new(config.monitor.check_interval())
        .run(&mut monitor, shutdown)
        .await;

    pool.close().await;
    info!("Alerter stopped");
    Ok(())
}
