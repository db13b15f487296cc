use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::catalog::{CatalogEntry, RawCatalogRecord};
use crate::config::SelectorConfig;
use crate::error::{ConfigError, FetchError};
use crate::fetcher::CatalogFetcher;
use crate::filter::CatalogFilter;
use crate::http_client::{HttpClient, NoopHttpClient, ReqwestHttpClient};
use crate::refresh::{RefreshCoordinator, RefreshReport};
use crate::selection::{Selection, SelectionState};

/// Point-in-time copy of the selector state.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorSnapshot {
    pub entries: Vec<CatalogEntry>,
    pub cursor: usize,
    pub excluded: Vec<String>,
}

/// Concurrency-safe owner of one [`SelectionState`].
///
/// `next`, `exclude`, `reset` and `refresh` all run under the same async
/// mutex. The lazy refresh inside `next` keeps the lock across the fetch, so
/// two callers never interleave a scan with a cursor update.
pub struct ModelSelector {
    coordinator: RefreshCoordinator,
    state: Mutex<SelectorState>,
}

#[derive(Default)]
struct SelectorState {
    selection: SelectionState,
    last_refresh: Option<RefreshReport>,
}

impl ModelSelector {
    pub fn new(coordinator: RefreshCoordinator) -> Self {
        Self {
            coordinator,
            state: Mutex::new(SelectorState::default()),
        }
    }

    /// Selector over the real catalog, configured from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(SelectorBuilder::from_env()?.build())
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Current usable candidate, refreshing once if nothing is loaded.
    pub async fn next(&self) -> Selection {
        let mut state = self.state.lock().await;
        if state.selection.is_empty() {
            let report = self.coordinator.refresh(&mut state.selection).await;
            state.last_refresh = Some(report);
        }
        state.selection.select()
    }

    /// Reports `id` as unusable for the rest of this selector's life.
    pub async fn exclude(&self, id: &str) {
        let mut state = self.state.lock().await;
        if state.selection.exclude(id) {
            info!(id, "excluded candidate");
        }
    }

    /// Re-fetches the catalog. The only way to pick up new candidates once loaded.
    pub async fn refresh(&self) -> RefreshReport {
        let mut state = self.state.lock().await;
        let report = self.coordinator.refresh(&mut state.selection).await;
        state.last_refresh = Some(report.clone());
        report
    }

    /// Report of the most recent refresh, lazy or explicit.
    pub async fn last_refresh(&self) -> Option<RefreshReport> {
        self.state.lock().await.last_refresh.clone()
    }

    pub async fn reset(&self, entries: Vec<CatalogEntry>) {
        self.state.lock().await.selection.reset(entries);
    }

    pub async fn snapshot(&self) -> SelectorSnapshot {
        let state = self.state.lock().await;
        let selection = &state.selection;
        let mut excluded = selection.excluded().iter().cloned().collect::<Vec<_>>();
        excluded.sort();
        SelectorSnapshot {
            entries: selection.entries().to_vec(),
            cursor: selection.cursor(),
            excluded,
        }
    }

    /// Unfiltered catalog straight from the fetcher; state is not touched.
    pub async fn raw_catalog(&self) -> Result<Vec<RawCatalogRecord>, FetchError> {
        self.coordinator.fetcher().try_fetch().await
    }
}

/// Wires config, transport, fetcher and filter into a [`ModelSelector`].
///
/// ```rust,ignore
/// use modelgate_core::SelectorBuilder;
///
/// let selector = SelectorBuilder::from_env()?.build();
/// let offline = SelectorBuilder::new(config).with_offline_mode().build();
/// ```
pub struct SelectorBuilder {
    config: SelectorConfig,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl SelectorBuilder {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            http_client: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(SelectorConfig::from_env()?))
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Use a transport that always answers with an empty catalog.
    pub fn with_offline_mode(self) -> Self {
        self.with_http_client(Arc::new(NoopHttpClient))
    }

    pub fn build(self) -> ModelSelector {
        let http_client: Arc<dyn HttpClient> = match self.http_client {
            Some(http_client) => http_client,
            None => Arc::new(ReqwestHttpClient::new()),
        };
        let fetcher = CatalogFetcher::new(&self.config, http_client);
        let filter = CatalogFilter::new(self.config.policy.clone());
        ModelSelector::new(RefreshCoordinator::new(fetcher, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use crate::http_client::{HttpError, HttpFuture, HttpRequest, HttpResponse};
    use crate::selection::UnavailableReason;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers with queued responses, then repeats the last one.
    struct ScriptedHttpClient {
        responses: std::sync::Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        last: std::sync::Mutex<Option<Result<HttpResponse, HttpError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
                last: std::sync::Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
            let _ = request;
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .responses
                .lock()
                .expect("script should not be poisoned")
                .pop_front();
            let mut last = self.last.lock().expect("script should not be poisoned");
            let response = match next {
                Some(response) => {
                    *last = Some(response.clone());
                    response
                }
                None => last
                    .clone()
                    .unwrap_or_else(|| Ok(HttpResponse::ok_json(r#"{"data": []}"#))),
            };
            Box::pin(async move { response })
        }
    }

    const THREE_MODELS: &str = r#"{"data": [
        {"id": "a", "name": "A", "context_length": 8192,
         "pricing": {"prompt": "0", "completion": "0"}, "supported_parameters": ["tools"]},
        {"id": "b:free", "name": "B", "context_length": 4096,
         "supported_parameters": ["tools"]},
        {"id": "c", "name": "C", "context_length": 128000,
         "pricing": {"prompt": "0.000001", "completion": "0.000002"},
         "supported_parameters": ["tools"]}
    ]}"#;

    fn selector(client: Arc<ScriptedHttpClient>) -> ModelSelector {
        let config = SelectorConfig::new("test-key").expect("valid key");
        SelectorBuilder::new(config).with_http_client(client).build()
    }

    fn id(selection: Selection) -> String {
        selection.into_candidate().expect("candidate expected").id
    }

    #[tokio::test]
    async fn first_query_refreshes_lazily_exactly_once() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            THREE_MODELS,
        ))]));
        let selector = selector(client.clone());

        assert_eq!(id(selector.next().await), "a");
        assert_eq!(id(selector.next().await), "a");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn rotation_scenario_ends_unavailable() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            THREE_MODELS,
        ))]));
        let selector = selector(client.clone());

        assert_eq!(id(selector.next().await), "a");
        selector.exclude("a").await;
        assert_eq!(id(selector.next().await), "b:free");
        selector.exclude("b:free").await;

        assert_eq!(
            selector.next().await,
            Selection::Unavailable(UnavailableReason::Exhausted)
        );
        // Populated state never refreshes on its own.
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn server_error_leaves_selector_unavailable() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::new(
            500, "boom",
        ))]));
        let selector = selector(client.clone());

        let report = selector.refresh().await;
        assert!(report.is_empty());
        assert_eq!(
            report.error.as_ref().map(FetchError::kind),
            Some(FetchErrorKind::Status)
        );

        assert_eq!(
            selector.next().await,
            Selection::Unavailable(UnavailableReason::EmptyCatalog)
        );
        // The empty state triggered one more lazy refresh.
        assert_eq!(client.calls(), 2);
        let last = selector.last_refresh().await.expect("lazy refresh is recorded");
        assert_eq!(last.error.map(|e| e.kind()), Some(FetchErrorKind::Status));
    }

    #[tokio::test]
    async fn explicit_refresh_keeps_exclusions() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::ok_json(THREE_MODELS)),
            Ok(HttpResponse::ok_json(THREE_MODELS)),
        ]));
        let selector = selector(client);

        assert_eq!(id(selector.next().await), "a");
        selector.exclude("a").await;

        let report = selector.refresh().await;
        assert_eq!(report.fetched, 3);
        assert_eq!(report.retained, 2);
        assert!(report.error.is_none());

        assert_eq!(id(selector.next().await), "b:free");
        let snapshot = selector.snapshot().await;
        assert_eq!(snapshot.excluded, vec![String::from("a")]);
        assert_eq!(snapshot.cursor, 1);
    }

    #[tokio::test]
    async fn refresh_picks_up_new_candidates() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::new(503, "")),
            Ok(HttpResponse::ok_json(THREE_MODELS)),
        ]));
        let selector = selector(client);

        assert!(selector.next().await.is_unavailable());
        selector.refresh().await;

        assert_eq!(id(selector.next().await), "a");
    }

    #[tokio::test]
    async fn concurrent_queries_share_one_lazy_refresh() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            THREE_MODELS,
        ))]));
        let selector = Arc::new(selector(client.clone()));

        let handles = (0..8)
            .map(|_| {
                let selector = Arc::clone(&selector);
                tokio::spawn(async move { selector.next().await })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            let selection = handle.await.expect("task should not panic");
            assert_eq!(id(selection), "a");
        }
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn raw_catalog_does_not_touch_state() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            THREE_MODELS,
        ))]));
        let selector = selector(client);

        let records = selector.raw_catalog().await.expect("catalog should load");

        assert_eq!(records.len(), 3);
        assert!(selector.snapshot().await.entries.is_empty());
    }

    #[tokio::test]
    async fn offline_mode_is_always_empty() {
        let config = SelectorConfig::new("test-key").expect("valid key");
        let selector = SelectorBuilder::new(config).with_offline_mode().build();

        assert_eq!(
            selector.next().await,
            Selection::Unavailable(UnavailableReason::EmptyCatalog)
        );
    }
}
