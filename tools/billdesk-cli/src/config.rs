//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use billdesk_core::Currency;
use billdesk_data::{FetchPolicy, RetryPolicy, TimeoutConfig};
use billdesk_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Endpoint the catalog is read from when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "http://localhost:3000/api/bill/items";

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["billdesk.toml", ".billdesk.toml", "billdesk.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BilldeskConfig {
    /// Catalog source configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Invoice defaults.
    #[serde(default)]
    pub invoice: InvoiceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BilldeskConfig {
    /// Load config from a file. `.json` paths are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Fetch policy for the catalog source.
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy::new(
            TimeoutConfig::from_millis(self.catalog.timeout_ms),
            RetryPolicy::new(self.catalog.max_retries),
        )
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Where and how the catalog is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL (`http://`, `https://`) or path to a JSON file.
    #[serde(default = "default_source")]
    pub source: String,

    /// Bound on the whole fetch, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first attempt.
    #[serde(default)]
    pub max_retries: u32,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            timeout_ms: default_timeout_ms(),
            max_retries: 0,
        }
    }
}

/// Invoice defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceConfig {
    /// Currency for rates and totals.
    #[serde(default)]
    pub currency: Currency,
}

/// Generate a default billdesk.toml config file.
pub fn generate_default_config(source: &str) -> String {
    format!(
        r#"# billdesk configuration

[catalog]
# URL of the bill items endpoint, or a path to a JSON file
source = "{source}"
timeout_ms = 5000
max_retries = 0

[invoice]
currency = "USD"

[logging]
# RUST_LOG takes precedence when set
level = "info"
format = "human"
"#,
        source = source
    )
}
