use modelgate_core::{CatalogEntry, ModelSelector, RefreshReport};
use serde::Serialize;

use crate::error::CliError;

use super::{with_refresh_warning, CommandResult};

#[derive(Debug, Serialize)]
struct CandidatesResponseData {
    refresh: RefreshReport,
    candidates: Vec<CatalogEntry>,
}

pub async fn run(selector: &ModelSelector) -> Result<CommandResult, CliError> {
    let refresh = selector.refresh().await;
    let candidates = selector.snapshot().await.entries;
    let latency_ms = refresh.latency_ms;

    let result = CommandResult::ok(serde_json::to_value(CandidatesResponseData {
        refresh: refresh.clone(),
        candidates,
    })?)
    .with_latency(latency_ms);

    Ok(with_refresh_warning(result, &refresh))
}
