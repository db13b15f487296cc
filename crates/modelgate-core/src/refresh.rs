use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::fetcher::CatalogFetcher;
use crate::filter::CatalogFilter;
use crate::selection::{Selection, SelectionState};

/// Diagnostic summary of one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
    pub fetched: usize,
    pub retained: usize,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_fetch_error")]
    pub error: Option<FetchError>,
    pub latency_ms: u64,
}

impl RefreshReport {
    pub fn is_empty(&self) -> bool {
        self.retained == 0
    }
}

fn serialize_fetch_error<S>(error: &Option<FetchError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Fetch, filter, replace.
#[derive(Clone)]
pub struct RefreshCoordinator {
    fetcher: CatalogFetcher,
    filter: CatalogFilter,
}

impl RefreshCoordinator {
    pub fn new(fetcher: CatalogFetcher, filter: CatalogFilter) -> Self {
        Self { fetcher, filter }
    }

    pub fn fetcher(&self) -> &CatalogFetcher {
        &self.fetcher
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    /// Replaces the candidate sequence of `state` with a freshly filtered catalog.
    ///
    /// A failed fetch resets the state to empty; the cause is kept in the report.
    pub async fn refresh(&self, state: &mut SelectionState) -> RefreshReport {
        let started = Instant::now();
        let (records, error) = match self.fetcher.try_fetch().await {
            Ok(records) => (records, None),
            Err(error) => {
                warn!(code = error.code(), %error, "catalog fetch failed; treating as empty");
                (Vec::new(), Some(error))
            }
        };

        let entries = self.filter.filter(&records);
        let report = RefreshReport {
            fetched: records.len(),
            retained: entries.len(),
            error,
            latency_ms: elapsed_ms(started),
        };
        state.reset(entries);

        info!(
            fetched = report.fetched,
            retained = report.retained,
            latency_ms = report.latency_ms,
            "refreshed candidate list"
        );
        report
    }

    /// Selection query with a single lazy refresh when `state` is empty.
    pub async fn next(&self, state: &mut SelectionState) -> Selection {
        if state.is_empty() {
            self.refresh(state).await;
        }
        state.select()
    }
}

/// Milliseconds since `started`, saturating at `u64::MAX`.
pub fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
