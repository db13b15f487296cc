use modelgate_core::{CatalogEntry, ModelSelector, Selection};
use serde::Serialize;

use crate::cli::SelectArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SelectResponseData {
    selected: CatalogEntry,
    excluded: Vec<String>,
}

pub async fn run(args: &SelectArgs, selector: &ModelSelector) -> Result<CommandResult, CliError> {
    if args.exclude.iter().any(|id| id.trim().is_empty()) {
        return Err(CliError::Command(String::from(
            "--exclude requires a non-empty candidate id",
        )));
    }

    for id in &args.exclude {
        selector.exclude(id).await;
    }

    let selection = selector.next().await;
    let latency_ms = selector
        .last_refresh()
        .await
        .map(|report| report.latency_ms)
        .unwrap_or(0);

    match selection {
        Selection::Candidate(selected) => {
            let data = serde_json::to_value(SelectResponseData {
                selected,
                excluded: args.exclude.clone(),
            })?;
            Ok(CommandResult::ok(data).with_latency(latency_ms))
        }
        Selection::Unavailable(reason) => {
            // An empty catalog caused by a failed fetch is reported as the fetch failure.
            if let Some(error) = selector.last_refresh().await.and_then(|report| report.error) {
                return Err(CliError::Fetch(error));
            }
            Err(CliError::Unavailable(reason))
        }
    }
}
