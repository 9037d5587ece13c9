//! List the catalog.

use anyhow::Result;
use serde::Serialize;

use super::CatalogArgs;
use crate::context::Context;
use crate::output::status_badge;
use billdesk_core::catalog::{CatalogItem, CatalogStatus};

#[derive(Serialize)]
struct CatalogListing<'a> {
    source: &'a str,
    status: &'a CatalogStatus,
    items: &'a [CatalogItem],
}

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let cache = ctx.load_catalog().await?;
    let items = match args.limit {
        Some(limit) => &cache.items()[..limit.min(cache.len())],
        None => cache.items(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&CatalogListing {
            source: &ctx.config.catalog.source,
            status: cache.status(),
            items,
        });
        return Ok(());
    }

    ctx.output.header("Catalog");
    ctx.output.kv("source", &ctx.config.catalog.source);
    ctx.output.kv("status", &status_badge(cache.status()));
    ctx.output.kv("items", &cache.len().to_string());

    if items.is_empty() {
        return Ok(());
    }
    println!();
    ctx.output.item_table(items);

    Ok(())
}
