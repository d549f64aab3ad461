//! One ingestion pass: fetch every configured price and append it to the ledger.
use crate::core::config::CurrencyPair;
use crate::core::currency::CurrencyProvider;
use crate::core::record::{LedgerRecord, PriceWriter};
use crate::core::stock::StockProvider;
use tracing::{error, info};

/// Outcome of one pass. A failed item is counted and skipped, never fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub failed: usize,
}

/// Fetches stocks first, then currency pairs, strictly one at a time.
///
/// `currencies` is `None` when no currency provider is configured.
pub async fn ingest(
    stock_provider: &dyn StockProvider,
    symbols: &[String],
    currencies: Option<(&dyn CurrencyProvider, &[CurrencyPair])>,
    writer: &dyn PriceWriter,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for symbol in symbols {
        let point = match stock_provider.fetch_stock(symbol).await {
            Ok(point) => point,
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Failed to fetch stock");
                summary.failed += 1;
                continue;
            }
        };
        let (close, date) = (point.close, point.date);
        let record = LedgerRecord::from(point);
        if let Err(e) = writer.append(&record) {
            error!(symbol = %symbol, error = %e, "Failed to write stock price");
            summary.failed += 1;
            continue;
        }
        info!(symbol = %record.symbol, price = close, %date, "Wrote stock price");
        summary.written += 1;
    }

    if let Some((currency_provider, pairs)) = currencies {
        for pair in pairs {
            let point = match currency_provider.fetch_currency(&pair.from, &pair.to).await {
                Ok(point) => point,
                Err(e) => {
                    error!(pair = %pair, error = %e, "Failed to fetch currency");
                    summary.failed += 1;
                    continue;
                }
            };
            let (rate, date) = (point.rate, point.date);
            if let Err(e) = writer.append(&LedgerRecord::from(point)) {
                error!(pair = %pair, error = %e, "Failed to write currency price");
                summary.failed += 1;
                continue;
            }
            info!(pair = %pair, rate, %date, "Wrote currency price");
            summary.written += 1;
        }
    }

    summary
}
