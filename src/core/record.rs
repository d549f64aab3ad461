//! Ledger price records and the writer abstraction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::core::currency::CurrencyDataPoint;
use crate::core::error::LedgerError;
use crate::core::stock::StockDataPoint;

/// Category of a ledger record. Only drives how the price is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Commodity,
    Currency,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RecordKind::Commodity => "commodity",
                RecordKind::Currency => "currency",
            }
        )
    }
}

impl FromStr for RecordKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commodity" => Ok(RecordKind::Commodity),
            "currency" => Ok(RecordKind::Currency),
            _ => Err(LedgerError::UnknownKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub time: DateTime<Utc>,
    pub symbol: String,
    pub price: f64,
    pub kind: RecordKind,
}

impl From<StockDataPoint> for LedgerRecord {
    fn from(point: StockDataPoint) -> Self {
        LedgerRecord {
            time: point.date,
            symbol: point.symbol,
            price: point.close,
            kind: RecordKind::Commodity,
        }
    }
}

impl From<CurrencyDataPoint> for LedgerRecord {
    fn from(point: CurrencyDataPoint) -> Self {
        LedgerRecord {
            time: point.date,
            symbol: point.from,
            price: point.rate,
            kind: RecordKind::Currency,
        }
    }
}

/// Sink for price records. Each call is independent of the previous one.
pub trait PriceWriter: Send + Sync {
    fn append(&self, record: &LedgerRecord) -> Result<(), LedgerError>;
}
