//! One-off catalog search.

use anyhow::Result;
use billdesk_core::search::filter;

use super::SearchArgs;
use crate::context::Context;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let cache = ctx.load_catalog().await?;
    let matches = filter(&args.query, cache.items());

    if ctx.output.is_json() {
        ctx.output.json(&matches);
        return Ok(());
    }

    if matches.is_empty() {
        ctx.output.info(&format!("No items match \"{}\"", args.query));
        return Ok(());
    }

    ctx.output.header(&format!("{} match(es) for \"{}\"", matches.len(), args.query));
    ctx.output.item_table(&matches);

    Ok(())
}
