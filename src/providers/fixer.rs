use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Method, Request, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::core::currency::{CurrencyDataPoint, CurrencyProvider};
use crate::core::error::FetchError;
use crate::core::http::HttpTransport;

pub const DEFAULT_BASE_URL: &str = "http://data.fixer.io/api/latest";
const PROVIDER_NAME: &str = "fixer";

#[derive(Debug, Deserialize)]
struct FixerResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    error: Option<FixerApiError>,
}

#[derive(Debug, Deserialize)]
struct FixerApiError {
    #[serde(default)]
    info: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl FixerApiError {
    fn message(self) -> String {
        self.info
            .or(self.kind)
            .unwrap_or_else(|| "request was not successful".to_string())
    }
}

/// Latest exchange rates from Fixer.
///
/// Fixer reports failures in the body with `success: false`, so the HTTP
/// status is not checked here; the decoded `success` flag is authoritative.
pub struct FixerProvider {
    api_key: String,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl FixerProvider {
    pub fn new(api_key: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, transport)
    }

    pub fn with_base_url(api_key: &str, base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        FixerProvider {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            transport,
        }
    }
}

#[async_trait]
impl CurrencyProvider for FixerProvider {
    #[instrument(name = "FixerFetch", skip(self))]
    async fn fetch_currency(&self, from: &str, to: &str) -> Result<CurrencyDataPoint, FetchError> {
        let pair = format!("{from}/{to}");
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("access_key", self.api_key.as_str()),
                ("base", from),
                ("symbols", to),
            ],
        )
        .map_err(|e| FetchError::Request {
            context: pair.clone(),
            message: e.to_string(),
        })?;
        debug!(endpoint = %self.base_url, "Requesting exchange rate");

        let response = self
            .transport
            .execute(Request::new(Method::GET, url))
            .await
            .map_err(|e| {
                error!(pair = %pair, error = %e, "Failed to execute HTTP request");
                FetchError::Transport {
                    context: pair.clone(),
                    source: e,
                }
            })?;
        debug!(status = %response.status(), "Received Fixer response");

        let body = response.bytes().await.map_err(|e| FetchError::Body {
            context: pair.clone(),
            source: e,
        })?;

        let data: FixerResponse = serde_json::from_slice(&body).map_err(|e| {
            error!(pair = %pair, error = %e, "Failed to decode JSON response");
            FetchError::Decode {
                context: pair.clone(),
                source: e,
            }
        })?;

        if !data.success {
            return Err(FetchError::Api {
                provider: PROVIDER_NAME,
                info: data
                    .error
                    .map(FixerApiError::message)
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        debug!(base = ?data.base, rates = data.rates.len(), "Fixer reported success");

        let rate = *data.rates.get(to).ok_or_else(|| FetchError::UnknownPair {
            from: from.to_string(),
            to: to.to_string(),
        })?;

        let date = Utc
            .timestamp_opt(data.timestamp, 0)
            .single()
            .ok_or(FetchError::InvalidTimestamp {
                context: pair,
                timestamp: data.timestamp,
            })?;

        Ok(CurrencyDataPoint {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            date,
        })
    }
}
