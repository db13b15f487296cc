mod candidates;
mod catalog;
mod demo;
mod select;

use modelgate_core::{ModelSelector, RefreshReport, SelectorBuilder, SelectorConfig};
use serde_json::{json, Value};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            latency_ms: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn to_document(&self) -> Value {
        json!({
            "data": self.data,
            "warnings": self.warnings,
            "latency_ms": self.latency_ms,
        })
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let selector = build_selector(cli)?;

    match &cli.command {
        Command::Select(args) => select::run(args, &selector).await,
        Command::Candidates => candidates::run(&selector).await,
        Command::Catalog(args) => catalog::run(args, &selector).await,
        Command::Demo => demo::run(&selector).await,
    }
}

fn build_selector(cli: &Cli) -> Result<ModelSelector, CliError> {
    let mut config = SelectorConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone())?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms)?;
    }

    Ok(SelectorBuilder::new(config).build())
}

/// Appends a warning naming the fetch failure behind an empty refresh.
fn with_refresh_warning(result: CommandResult, report: &RefreshReport) -> CommandResult {
    match &report.error {
        Some(error) => result.with_warning(format!("catalog refresh failed: {error}")),
        None => result,
    }
}
