//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch, filter and export characters from a paginated REST API
#[derive(Parser, Debug)]
#[command(name = "charsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// URL of the first page (overrides source.url)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Maximum pages to fetch (overrides limits.max_pages)
    #[arg(long, global = true)]
    pub max_pages: Option<u32>,

    /// Abort on records missing a required field instead of skipping them
    #[arg(long, global = true)]
    pub fail_on_missing: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch matching characters and write them to a CSV file
    Export {
        /// Output CSV path (overrides output.path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch matching characters and print them as JSON
    Fetch {
        /// Pretty-print the JSON array
        #[arg(long)]
        pretty: bool,
    },

    /// Start HTTP server mode
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the effective configuration
    Config,
}
