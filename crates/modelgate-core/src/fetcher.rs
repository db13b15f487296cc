use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{CatalogResponse, RawCatalogRecord};
use crate::config::SelectorConfig;
use crate::error::FetchError;
use crate::http_client::{HttpAuth, HttpClient, HttpErrorKind, HttpRequest};

const BODY_EXCERPT_CHARS: usize = 200;

/// Retrieves raw records from the catalog endpoint.
///
/// One GET per call, bounded by the configured timeout, never retried.
#[derive(Clone)]
pub struct CatalogFetcher {
    http_client: Arc<dyn HttpClient>,
    url: String,
    auth: HttpAuth,
    referer: String,
    title: String,
    timeout_ms: u64,
}

impl CatalogFetcher {
    pub fn new(config: &SelectorConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            url: config.models_url(),
            auth: config.auth(),
            referer: config.referer.clone(),
            title: config.title.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    fn request(&self) -> HttpRequest {
        HttpRequest::get(&self.url)
            .with_auth(&self.auth)
            .with_header("HTTP-Referer", &self.referer)
            .with_header("X-Title", &self.title)
            .with_timeout_ms(self.timeout_ms)
    }

    /// Fetches the catalog, reporting why it failed.
    pub async fn try_fetch(&self) -> Result<Vec<RawCatalogRecord>, FetchError> {
        let response = self
            .http_client
            .execute(self.request())
            .await
            .map_err(|error| match error.kind() {
                HttpErrorKind::Timeout => FetchError::network(format!(
                    "catalog request timed out after {} ms: {error}",
                    self.timeout_ms
                )),
                _ => FetchError::network(format!("catalog transport error: {error}")),
            })?;

        if !response.is_ok() {
            let excerpt = response
                .body
                .chars()
                .take(BODY_EXCERPT_CHARS)
                .collect::<String>();
            return Err(FetchError::status(response.status, excerpt.trim()));
        }

        let catalog: CatalogResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::decode(format!("failed to parse catalog response: {e}")))?;

        debug!(url = %self.url, records = catalog.data.len(), "fetched catalog");
        Ok(catalog.data)
    }

    /// Fetches the catalog; every failure collapses to an empty sequence.
    pub async fn fetch(&self) -> Vec<RawCatalogRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(error) => {
                warn!(url = %self.url, code = error.code(), %error, "catalog fetch failed");
                Vec::new()
            }
        }
    }
}
