mod config;
mod dispatch;
mod logging;
mod notifier;
mod scheduler;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::DaemonConfig;
use dispatch::{DispatchOutcome, QuoteDispatcher};
use quotey_core::{QuoteSelector, QuoteStore};
use scheduler::{DailySchedule, QuoteScheduler};
use state::{JsonLedgerStore, LedgerStore};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "quotey", version, about = "Emails a rotating quote on a daily schedule")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one quote immediately and exit.
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_tracing()?;

    let config_path = config::resolve_config_path();
    let config = DaemonConfig::load_from(&config_path)?;
    info!(
        config = %config_path.display(),
        quotes = config.quotes.len(),
        max_repetition = config.rotation.max_repetition,
        recipients = config.email.to.len(),
        smtp_server = %config.smtp.server,
        smtp_port = config.smtp.port,
        notifier = ?config.notifier.backend,
        state = %config.state.path.display(),
        "loaded quotey config"
    );

    let store = QuoteStore::new(config.quotes.clone()).context("invalid quote configuration")?;
    let selector = QuoteSelector::new(store, config.rotation.max_repetition);
    if selector.always_rotates() {
        warn!(
            quotes = selector.store().len(),
            max_repetition = selector.max_repetition(),
            "max_repetition is not below the number of quotes; quotes will repeat in a fixed cycle"
        );
    }

    let persistence = Arc::new(JsonLedgerStore::new(config.state.path.clone()));
    let ledger = persistence.load().await?;
    info!(used = ledger.len(), path = %persistence.path().display(), "loaded usage ledger");

    let notifier = notifier::build_notifier(&config)?;
    let dispatcher = Arc::new(QuoteDispatcher::new(
        selector,
        ledger,
        config.email.clone(),
        notifier,
        persistence,
    ));

    if let Some(Command::Test) = cli.command {
        info!("test mode: sending a quote immediately");
        match dispatcher.send_now().await {
            DispatchOutcome::Delivered {
                quote,
                path,
                persisted,
            } => info!(%quote, ?path, persisted, "test mode: quote delivered"),
            DispatchOutcome::DeliveryFailed => warn!("test mode: quote was not delivered"),
        }
        return Ok(());
    }

    let schedule = DailySchedule::from_times(&config.schedule.times)?;
    if config.schedule.startup_notification {
        info!("sending startup notification email");
        dispatcher
            .send_startup_notification(&schedule.labels().join(", "))
            .await;
    }

    QuoteScheduler::new(schedule, dispatcher).run().await
}
