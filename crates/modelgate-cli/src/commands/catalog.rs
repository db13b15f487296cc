use std::time::Instant;

use modelgate_core::{elapsed_ms, ModelSelector, RawCatalogRecord};
use serde::Serialize;

use crate::cli::CatalogArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize, PartialEq)]
struct CatalogResponseData {
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    matching: Option<Vec<String>>,
    free: Vec<String>,
}

pub async fn run(args: &CatalogArgs, selector: &ModelSelector) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let records = selector.raw_catalog().await?;
    let free_marker = &selector.coordinator().filter().policy().free_marker;

    let data = summarize(&records, args, free_marker);
    let latency_ms = elapsed_ms(started);

    Ok(CommandResult::ok(serde_json::to_value(data)?).with_latency(latency_ms))
}

fn summarize(records: &[RawCatalogRecord], args: &CatalogArgs, free_marker: &str) -> CatalogResponseData {
    let needle = args.contains.as_ref().map(|value| value.to_lowercase());
    let matches_needle = |record: &&RawCatalogRecord| {
        needle
            .as_deref()
            .map_or(true, |needle| record.id.to_lowercase().contains(needle))
    };

    let free = records
        .iter()
        .filter(|record| record.id.contains(free_marker))
        .filter(matches_needle)
        .map(|record| record.id.clone())
        .collect();

    let matching = if args.free_only {
        None
    } else {
        Some(
            records
                .iter()
                .filter(matches_needle)
                .map(|record| record.id.clone())
                .collect(),
        )
    };

    CatalogResponseData {
        total: records.len(),
        matching,
        free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> Vec<RawCatalogRecord> {
        ids.iter()
            .map(|id| {
                serde_json::from_value(serde_json::json!({ "id": id })).expect("valid record")
            })
            .collect()
    }

    #[test]
    fn substring_filter_is_case_insensitive() {
        let args = CatalogArgs {
            contains: Some(String::from("Gemini")),
            free_only: false,
        };

        let data = summarize(
            &records(&["google/gemini-pro", "google/gemini-flash:free", "meta/llama:free"]),
            &args,
            ":free",
        );

        assert_eq!(data.total, 3);
        assert_eq!(
            data.matching,
            Some(vec![
                String::from("google/gemini-pro"),
                String::from("google/gemini-flash:free"),
            ])
        );
        assert_eq!(data.free, vec![String::from("google/gemini-flash:free")]);
    }

    #[test]
    fn free_only_omits_the_full_listing() {
        let args = CatalogArgs {
            contains: None,
            free_only: true,
        };

        let data = summarize(&records(&["a", "b:free"]), &args, ":free");

        assert_eq!(data.matching, None);
        assert_eq!(data.free, vec![String::from("b:free")]);
    }
}
