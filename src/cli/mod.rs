//! CLI module
//!
//! Command-line interface for the fetch-and-filter pipeline.
//!
//! # Commands
//!
//! - `export` - Fetch matching characters into a CSV file
//! - `fetch` - Print matching characters as JSON
//! - `serve` - Start HTTP server mode (`/healthcheck`, `/fetch`)
//! - `config` - Print the effective configuration

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve, AppState};
