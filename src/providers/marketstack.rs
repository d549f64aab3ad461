use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::core::error::FetchError;
use crate::core::http::HttpTransport;
use crate::core::stock::{StockDataPoint, StockProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.marketstack.com/v2/eod";

/// Marketstack timestamps look like `2025-08-18T00:00:00+0000`: no colon in the offset.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

fn deserialize_marketstack_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_str(&s, DATE_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

#[derive(Deserialize, Debug)]
struct MarketstackResponse {
    data: Vec<EodItem>,
}

#[derive(Deserialize, Debug)]
struct EodItem {
    symbol: String,
    #[serde(deserialize_with = "deserialize_marketstack_date")]
    date: DateTime<Utc>,
    close: f64,
    volume: Option<f64>,
}

/// End-of-day stock prices from Marketstack.
pub struct MarketstackProvider {
    api_key: String,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl MarketstackProvider {
    pub fn new(api_key: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, transport)
    }

    pub fn with_base_url(api_key: &str, base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        MarketstackProvider {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            transport,
        }
    }

    fn build_request(&self, symbol: &str) -> Result<Request, FetchError> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("access_key", self.api_key.as_str()),
                ("symbols", symbol),
                ("latest", "true"),
                ("limit", "1"),
            ],
        )
        .map_err(|e| {
            error!(symbol, error = %e, "Failed to create HTTP request");
            FetchError::Request {
                context: symbol.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Request::new(Method::GET, url))
    }
}

#[async_trait]
impl StockProvider for MarketstackProvider {
    #[instrument(name = "MarketstackFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_stock(&self, symbol: &str) -> Result<StockDataPoint, FetchError> {
        let request = self.build_request(symbol)?;
        debug!(endpoint = %self.base_url, "Requesting end-of-day data");

        let response = self.transport.execute(request).await.map_err(|e| {
            error!(symbol, error = %e, "Failed to execute HTTP request");
            FetchError::Transport {
                context: symbol.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(symbol, %status, "Received non-OK HTTP status");
            return Err(FetchError::Status {
                context: symbol.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            error!(symbol, error = %e, "Failed to read response body");
            FetchError::Body {
                context: symbol.to_string(),
                source: e,
            }
        })?;

        let data: MarketstackResponse = serde_json::from_slice(&body).map_err(|e| {
            error!(symbol, error = %e, "Failed to decode JSON response");
            FetchError::Decode {
                context: symbol.to_string(),
                source: e,
            }
        })?;

        let item = data
            .data
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NoData(symbol.to_string()))?;

        Ok(StockDataPoint {
            symbol: item.symbol,
            date: item.date,
            close: item.close,
            volume: item.volume.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EOD_PATH: &str = "/v2/eod";

    async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EOD_PATH))
            .and(query_param("access_key", "test-key"))
            .and(query_param("latest", "true"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_for(mock_server: &MockServer) -> MarketstackProvider {
        MarketstackProvider::with_base_url(
            "test-key",
            &format!("{}{}", mock_server.uri(), EOD_PATH),
            Arc::new(reqwest::Client::new()),
        )
    }

    /// Records the URL it was asked for, then fails like a dead network.
    struct FailingTransport {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpTransport for FailingTransport {
        async fn execute(&self, request: Request) -> anyhow::Result<reqwest::Response> {
            self.seen.lock().unwrap().push(request.url().to_string());
            Err(anyhow!("simulated network failure"))
        }
    }

    #[tokio::test]
    async fn test_successful_stock_fetch() {
        let mock_response = r#"{"data":[{"symbol":"AAPL","date":"2025-08-18T00:00:00+0000","close":150.75,"volume":12345678}]}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);

        let point = provider.fetch_stock("AAPL").await.unwrap();
        assert_eq!(point.symbol, "AAPL");
        assert_eq!(point.close, 150.75);
        assert_eq!(point.volume, 12345678.0);
        assert_eq!(point.date, Utc.with_ymd_and_hms(2025, 8, 18, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_offset_is_applied_to_date() {
        let mock_response = r#"{"data":[{"symbol":"SAP.XETRA","date":"2025-08-18T17:30:00+0200","close":250.1,"volume":null}]}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);

        let point = provider.fetch_stock("SAP.XETRA").await.unwrap();
        assert_eq!(point.date, Utc.with_ymd_and_hms(2025, 8, 18, 15, 30, 0).unwrap());
        assert_eq!(point.volume, 0.0);
    }

    #[tokio::test]
    async fn test_only_first_record_is_used() {
        let mock_response = r#"{"data":[
            {"symbol":"MSFT","date":"2025-08-18T00:00:00+0000","close":500.0,"volume":1},
            {"symbol":"MSFT","date":"2025-08-15T00:00:00+0000","close":490.0,"volume":2}
        ]}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);

        let point = provider.fetch_stock("MSFT").await.unwrap();
        assert_eq!(point.close, 500.0);
        assert_eq!(point.volume, 1.0);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = create_mock_server(404, "not found").await;
        let provider = provider_for(&mock_server);

        let err = provider.fetch_stock("TEST").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
        assert_eq!(
            err.to_string(),
            "bad response status for TEST: 404 Not Found"
        );
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mock_server = create_mock_server(200, r#"{"data":[{"#).await;
        let provider = provider_for(&mock_server);

        let err = provider.fetch_stock("TEST").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(err.to_string().starts_with("failed to decode response for TEST"));
    }

    #[tokio::test]
    async fn test_unparseable_date() {
        let mock_response =
            r#"{"data":[{"symbol":"AAPL","date":"2025-08-18","close":150.75,"volume":1}]}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = provider_for(&mock_server);

        let err = provider.fetch_stock("AAPL").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_empty_data() {
        let mock_server = create_mock_server(200, r#"{"data":[]}"#).await;
        let provider = provider_for(&mock_server);

        let err = provider.fetch_stock("ZZZZ").await.unwrap_err();
        assert!(matches!(err, FetchError::NoData(_)));
        assert_eq!(err.to_string(), "no data returned for symbol ZZZZ");
    }

    #[tokio::test]
    async fn test_network_error() {
        let transport = Arc::new(FailingTransport {
            seen: Mutex::new(Vec::new()),
        });
        let provider = MarketstackProvider::new("secret", transport.clone());

        let err = provider.fetch_stock("AAPL").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(
            err.to_string(),
            "failed to fetch data for AAPL: simulated network failure"
        );

        let seen = transport.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            ["https://api.marketstack.com/v2/eod?access_key=secret&symbols=AAPL&latest=true&limit=1"]
        );
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let provider =
            MarketstackProvider::with_base_url("k", "not a url", Arc::new(reqwest::Client::new()));

        let err = provider.fetch_stock("AAPL").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }
}
