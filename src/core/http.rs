//! HTTP transport abstraction used by the providers.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("ledgerprice/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can turn a request into a response.
///
/// Providers only ever talk to the network through this trait, so a scripted
/// fake or a recording proxy can stand in for the real client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

/// Builds the client shared by all providers for one run.
pub fn default_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}
