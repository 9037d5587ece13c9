//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use billdesk_core::catalog::{CatalogCache, CatalogSource, CatalogStatus};
use billdesk_core::Currency;

use crate::config::{BilldeskConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration, CLI overrides applied.
    pub config: BilldeskConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one found
    /// walking up from the working directory.
    pub fn load(config_path: Option<&str>, source: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => find_config(&cwd),
        };
        let mut config = match &config_path {
            Some(path) => BilldeskConfig::load(path)?,
            None => BilldeskConfig::default(),
        };

        if let Some(source) = source {
            config.catalog.source = source.to_string();
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    pub fn currency(&self) -> Currency {
        self.config.invoice.currency
    }

    /// Source for the configured catalog location.
    pub fn open_source(&self) -> Result<Box<dyn CatalogSource>> {
        billdesk_data::open_source(
            &self.config.catalog.source,
            self.config.fetch_policy(),
            self.currency(),
        )
        .with_context(|| format!("Failed to open catalog source: {}", self.config.catalog.source))
    }

    /// Fetch the catalog once, with a spinner while waiting.
    ///
    /// A failed fetch is reported as a warning and yields an empty catalog.
    pub async fn load_catalog(&self) -> Result<CatalogCache> {
        let source = self.open_source()?;
        let mut cache = CatalogCache::new();

        let spinner = self.output.spinner(&format!("Loading catalog from {}", source.name()));
        let status = cache.load(source.as_ref()).await.clone();
        spinner.finish_and_clear();

        self.report_status(&status);
        Ok(cache)
    }

    /// Tell the operator how the catalog load went.
    pub fn report_status(&self, status: &CatalogStatus) {
        match status {
            CatalogStatus::Ready { items } => {
                self.output.debug(&format!("Catalog ready: {} items", items));
            }
            CatalogStatus::Failed { reason } => {
                self.output.warn(&format!("Catalog unavailable, continuing with no items: {}", reason));
            }
            CatalogStatus::Pending => {}
        }
    }
}

/// Find the nearest config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}
