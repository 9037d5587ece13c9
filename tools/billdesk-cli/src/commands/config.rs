//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, path } => init_config(force, path.as_deref(), ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[catalog]");
    ctx.output.kv("source", &ctx.config.catalog.source);
    ctx.output.kv("timeout_ms", &ctx.config.catalog.timeout_ms.to_string());
    ctx.output.kv("max_retries", &ctx.config.catalog.max_retries.to_string());

    ctx.output.info("[invoice]");
    ctx.output.kv("currency", ctx.config.invoice.currency.code());

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level.to_string());
    ctx.output.kv("format", &ctx.config.logging.format.to_string());

    Ok(())
}

fn init_config(force: bool, path: Option<&str>, ctx: &Context) -> Result<()> {
    let config_path = match path {
        Some(path) => ctx.cwd.join(path),
        None => ctx.cwd.join("billdesk.toml"),
    };

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    // JSON has no comments, so write the effective config as-is.
    if config_path.extension().is_some_and(|ext| ext == "json") {
        ctx.config.save(&config_path)?;
    } else {
        let content = generate_default_config(&ctx.config.catalog.source);
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
