//! Catalog sources backed by HTTP and the filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use billdesk_core::catalog::{CatalogItem, CatalogPayload, CatalogSource};
use billdesk_core::{BillingError, Currency};

use crate::client::{FetchClient, FetchError, FetchPolicy};
use crate::timeout::TimeoutError;

/// Reads the catalog from the bill items endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    url: String,
    client: FetchClient,
    currency: Currency,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, policy: FetchPolicy, currency: Currency) -> Result<Self, FetchError> {
        Ok(Self {
            url: url.into(),
            client: FetchClient::new(policy)?,
            currency,
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, BillingError> {
        let body = self.client.get_bytes(&self.url).await?;
        let payload = CatalogPayload::from_slice(&body)
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;
        Ok(payload.into_items(self.currency))
    }
}

/// Reads the catalog from a JSON file with the same shape as the endpoint.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
    name: String,
    policy: FetchPolicy,
    currency: Currency,
}

impl FileCatalogSource {
    pub fn new(path: impl AsRef<Path>, policy: FetchPolicy, currency: Currency) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
            policy,
            currency,
        }
    }

    async fn read(&self) -> Result<Vec<u8>, FetchError> {
        let total = self.policy.timeout.total;
        match tokio::time::timeout(total, tokio::fs::read(&self.path)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(FetchError::Io {
                path: self.name.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(TimeoutError::new(total).into()),
        }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, BillingError> {
        let body = self.read().await?;
        let payload = CatalogPayload::from_slice(&body)
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;
        Ok(payload.into_items(self.currency))
    }
}

/// Pick a source for `location`: `http://` and `https://` locations are
/// fetched over HTTP, anything else is treated as a file path.
pub fn open_source(
    location: &str,
    policy: FetchPolicy,
    currency: Currency,
) -> Result<Box<dyn CatalogSource>, FetchError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpCatalogSource::new(location, policy, currency)?))
    } else {
        Ok(Box::new(FileCatalogSource::new(location, policy, currency)))
    }
}
