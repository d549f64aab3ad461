pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::currency::CurrencyProvider;
use crate::core::http::{HttpTransport, default_client};
use crate::core::ingest::{RunSummary, ingest};
use crate::providers::{FixerProvider, MarketstackProvider, fixer, marketstack};
use crate::store::LedgerWriter;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one ingestion pass with the config at `config_path`, or the default config.
pub async fn run(config_path: Option<&str>) -> Result<RunSummary> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    let transport: Arc<dyn HttpTransport> = Arc::new(default_client()?);

    let stock_provider = MarketstackProvider::with_base_url(
        &config.marketstack.key,
        config
            .marketstack
            .base_url
            .as_deref()
            .unwrap_or(marketstack::DEFAULT_BASE_URL),
        Arc::clone(&transport),
    );

    let currency_provider = config.fixer.api_key().map(|key| {
        FixerProvider::with_base_url(
            key,
            config
                .fixer
                .base_url
                .as_deref()
                .unwrap_or(fixer::DEFAULT_BASE_URL),
            Arc::clone(&transport),
        )
    });
    if currency_provider.is_none() {
        debug!("No fixer key configured, skipping currency pairs");
    }

    let writer = LedgerWriter::new(&config.ledger.price_db);
    info!(
        ledger = %writer.path().display(),
        stocks = config.marketstack.stocks.len(),
        pairs = config.fixer.pairs.len(),
        "Fetching prices"
    );

    let summary = ingest(
        &stock_provider,
        &config.marketstack.stocks,
        currency_provider
            .as_ref()
            .map(|p| (p as &dyn CurrencyProvider, config.fixer.pairs.as_slice())),
        &writer,
    )
    .await;

    info!(
        written = summary.written,
        failed = summary.failed,
        "Finished fetching prices"
    );
    Ok(summary)
}
