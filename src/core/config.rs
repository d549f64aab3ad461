use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MarketstackConfig {
    pub key: String,
    #[serde(default)]
    pub stocks: Vec<String>,
    /// Overrides the end-of-day endpoint, e.g. for a proxy or a test server.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FixerConfig {
    /// Currency fetching is disabled when no key is set.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub pairs: Vec<CurrencyPair>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl FixerConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LedgerConfig {
    pub price_db: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub marketstack: MarketstackConfig,
    #[serde(default)]
    pub fixer: FixerConfig,
    pub ledger: LedgerConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "ledgerprice")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!(
            stocks = config.marketstack.stocks.len(),
            pairs = config.fixer.pairs.len(),
            "Successfully loaded config"
        );
        Ok(config)
    }
}
