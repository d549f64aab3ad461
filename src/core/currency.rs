//! Currency exchange rate abstractions

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::FetchError;

/// Exchange rate for one `from`/`to` pair: one unit of `from` buys `rate` units of `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyDataPoint {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub date: DateTime<Utc>,
}

#[async_trait]
pub trait CurrencyProvider: Send + Sync {
    async fn fetch_currency(&self, from: &str, to: &str) -> Result<CurrencyDataPoint, FetchError>;
}
