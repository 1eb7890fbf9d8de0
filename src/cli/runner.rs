//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::cli::server;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::{write_csv, write_json};
use crate::pipeline::PipelineOutput;
use crate::types::MissingFieldPolicy;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.config()?;

        match &self.cli.command {
            Commands::Export { output } => {
                let path = output.as_deref().unwrap_or(&config.output.path);
                self.export(&config, path).await
            }
            Commands::Fetch { pretty } => self.fetch(&config, *pretty).await,
            Commands::Serve { host, port } => {
                let host = host.as_deref().unwrap_or(&config.server.host);
                let port = port.unwrap_or(config.server.port);
                server::serve(&config, host, port).await
            }
            Commands::Config => {
                print!("{}", config.to_yaml()?);
                Ok(())
            }
        }
    }

    /// Load the config file (or defaults) and apply command-line overrides
    pub fn config(&self) -> Result<AppConfig> {
        let mut config = match &self.cli.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(url) = &self.cli.url {
            config.source.url.clone_from(url);
        }
        if let Some(max_pages) = self.cli.max_pages {
            config.limits.max_pages = max_pages;
        }
        if self.cli.fail_on_missing {
            config.filter.on_missing_field = MissingFieldPolicy::Fail;
        }

        config.validate()?;
        Ok(config)
    }

    /// Run the pipeline and write the CSV file
    async fn export(&self, config: &AppConfig, path: &Path) -> Result<()> {
        println!("Fetching characters...");
        let output = run_pipeline(config).await?;

        let path = write_csv(path, &output.records)?;
        println!(
            "Saved {} characters to {}",
            output.records.len(),
            path.display()
        );
        Ok(())
    }

    /// Run the pipeline and print JSON to stdout
    async fn fetch(&self, config: &AppConfig, pretty: bool) -> Result<()> {
        let output = run_pipeline(config).await?;
        write_json(std::io::stdout().lock(), &output.records, pretty)
    }
}

async fn run_pipeline(config: &AppConfig) -> Result<PipelineOutput> {
    let pipeline = config.pipeline()?;
    let cancel = cancel_on_ctrl_c();
    let output = pipeline.run(&config.source.url, &cancel).await?;

    if output.stats.records_skipped > 0 {
        warn!(
            "{} records skipped for missing fields",
            output.stats.records_skipped
        );
    }
    info!(
        "Fetched {} pages, kept {} of {} records",
        output.stats.pages_fetched, output.stats.records_kept, output.stats.records_seen
    );
    Ok(output)
}

/// Token cancelled on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling fetch");
            trigger.cancel();
        }
    });
    token
}
