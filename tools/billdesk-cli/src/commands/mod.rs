//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod invoice;
pub mod search;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Show only the first N items.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in item descriptions (case-insensitive).
    pub query: String,
}

/// Arguments for the invoice command.
#[derive(Args)]
pub struct InvoiceArgs {
    /// Write the finished invoice as JSON to this file.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// File to write (default: billdesk.toml). A `.json` path writes JSON.
        #[arg(long)]
        path: Option<String>,
    },
}
