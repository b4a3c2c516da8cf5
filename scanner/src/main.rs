// Scanner entry point: one scan, then email the results table
use anyhow::Context;
use scanner::config::{credential_provider, ScanSettings};
use scanner::data::price_source;
use scanner::services::{run_scan, EmailNotifier};
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let run_id = Uuid::new_v4();
    run().instrument(info_span!("scan", %run_id)).await
}

async fn run() -> anyhow::Result<()> {
    let settings = ScanSettings::from_env().context("failed to resolve scan settings")?;
    info!(strategy = %settings.strategy, tickers = %settings.tickers_file.display(), "Starting daily scan");

    let source = price_source(&settings.price_source).context("failed to set up price source")?;
    let report = match run_scan(&settings, source.as_ref()).await.context("scan failed")? {
        Some(report) => report,
        None => return Ok(()),
    };

    if !settings.email.enabled {
        warn!("Email delivery disabled, results left at {}", report.results_file.display());
        return Ok(());
    }

    let credentials = credential_provider(&settings.email);
    let notifier = EmailNotifier::from_settings(&settings.email, credentials.as_ref())
        .context("email notifier setup failed")?;
    notifier
        .send(&[report.results_file.clone()])
        .await
        .context("failed to email results")?;

    info!(results = %report.results_file.display(), "Daily scan complete");
    Ok(())
}
