//! Error types shared by providers and the ledger writer.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while fetching a data point from a remote provider.
///
/// `context` names what was being fetched: a symbol for stocks, a
/// `FROM/TO` pair for currencies.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create request for {context}: {message}")]
    Request { context: String, message: String },

    #[error("failed to fetch data for {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("bad response status for {context}: {status}")]
    Status { context: String, status: StatusCode },

    #[error("failed to read response for {context}: {source}")]
    Body {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no data returned for symbol {0}")]
    NoData(String),

    #[error("{provider}: {info}")]
    Api { provider: &'static str, info: String },

    #[error("unknown currency pair {from}/{to}")]
    UnknownPair { from: String, to: String },

    #[error("invalid timestamp {timestamp} for {context}")]
    InvalidTimestamp { context: String, timestamp: i64 },
}

/// Failure while appending a record to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown kind {0:?}")]
    UnknownKind(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_context() {
        let err = FetchError::NoData("ZZZZ".to_string());
        assert_eq!(err.to_string(), "no data returned for symbol ZZZZ");

        let err = FetchError::Status {
            context: "AAPL".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), "bad response status for AAPL: 404 Not Found");

        let err = FetchError::Api {
            provider: "fixer",
            info: "Invalid API key".to_string(),
        };
        assert_eq!(err.to_string(), "fixer: Invalid API key");

        let err = FetchError::UnknownPair {
            from: "EUR".to_string(),
            to: "XYZ".to_string(),
        };
        assert_eq!(err.to_string(), "unknown currency pair EUR/XYZ");
    }

    #[test]
    fn test_transport_error_keeps_source() {
        use std::error::Error;

        let err = FetchError::Transport {
            context: "AAPL".to_string(),
            source: anyhow::anyhow!("network down"),
        };
        assert_eq!(err.to_string(), "failed to fetch data for AAPL: network down");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LedgerError::from(io);
        assert_eq!(err.to_string(), "denied");
    }
}
