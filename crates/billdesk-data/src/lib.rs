//! Catalog sources for billdesk.
//!
//! This crate provides:
//! - `HttpCatalogSource` - Reads the bill items endpoint
//! - `FileCatalogSource` - Reads a JSON file of the same shape
//! - `FetchClient` - HTTP fetch with a bounded timeout and optional retries
//! - `TimeoutConfig` / `RetryPolicy` - Fetch policy building blocks

mod client;
mod retry;
mod source;
mod timeout;

pub use client::*;
pub use retry::*;
pub use source::*;
pub use timeout::*;
