//! billdesk - Invoice entry from the command line.
//!
//! Commands:
//! - `billdesk catalog` - List the catalog
//! - `billdesk search` - Find catalog items by description
//! - `billdesk invoice` - Build an invoice interactively
//! - `billdesk config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use billdesk_observability::{LogLevel, LoggingConfig};
use clap::{Parser, Subcommand};

use commands::{CatalogArgs, ConfigArgs, InvoiceArgs, SearchArgs};

/// billdesk - Pick catalog items and build invoices
#[derive(Parser)]
#[command(name = "billdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog URL or JSON file, overriding the config
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Log level (trace, debug, info, warn, error), overriding the config
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items
    Catalog(CatalogArgs),

    /// Search catalog items by description
    Search(SearchArgs),

    /// Build an invoice interactively
    Invoice(InvoiceArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), cli.source.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let logging = logging_config(&cli, &ctx.config.logging);
    init_logging(&logging, &ctx.output);

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Invoice(args) => commands::invoice::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Apply `--log-level` and `--verbose` on top of the configured logging.
fn logging_config(cli: &Cli, configured: &LoggingConfig) -> LoggingConfig {
    let mut logging = configured.clone();
    if let Some(level) = cli.log_level {
        logging.level = level;
    }
    if cli.verbose {
        logging.level = logging.level.min(LogLevel::Debug);
    }
    logging
}

fn init_logging(config: &LoggingConfig, output: &output::Output) {
    if let Err(e) = billdesk_observability::init(config) {
        output.warn(&format!("Logging disabled: {}", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billdesk_observability::LogFormat;

    #[test]
    fn test_log_level_flag_overrides_config() {
        let cli = Cli::try_parse_from(["billdesk", "--log-level", "WARN", "catalog"]).unwrap();
        let configured = LoggingConfig::new(LogLevel::Debug, LogFormat::Json);

        let logging = logging_config(&cli, &configured);
        assert_eq!(logging.level, LogLevel::Warn);
        assert_eq!(logging.format, LogFormat::Json);
    }

    #[test]
    fn test_verbose_lowers_to_debug_at_most() {
        let cli = Cli::try_parse_from(["billdesk", "catalog", "-v", "--log-level", "error"]).unwrap();
        assert_eq!(logging_config(&cli, &LoggingConfig::default()).level, LogLevel::Debug);

        let cli = Cli::try_parse_from(["billdesk", "-v", "--log-level", "trace", "catalog"]).unwrap();
        assert_eq!(logging_config(&cli, &LoggingConfig::default()).level, LogLevel::Trace);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = Cli::try_parse_from(["billdesk", "--log-level", "loud", "catalog"]).err().unwrap();
        assert!(err.to_string().contains("Invalid log level: loud"));
    }
}
