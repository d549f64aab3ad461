//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod http;
pub mod ingest;
pub mod log;
pub mod record;
pub mod stock;

// Re-export main types for cleaner imports
pub use currency::{CurrencyDataPoint, CurrencyProvider};
pub use error::{FetchError, LedgerError};
pub use http::HttpTransport;
pub use ingest::{RunSummary, ingest};
pub use record::{LedgerRecord, PriceWriter, RecordKind};
pub use stock::{StockDataPoint, StockProvider};
