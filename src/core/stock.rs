//! End-of-day stock price abstractions

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::FetchError;

/// A single end-of-day record for a tradable symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct StockDataPoint {
    pub symbol: String,
    pub date: DateTime<Utc>,
    pub close: f64,
    pub volume: f64,
}

#[async_trait]
pub trait StockProvider: Send + Sync {
    async fn fetch_stock(&self, symbol: &str) -> Result<StockDataPoint, FetchError>;
}
