//! Caller-side retry loop over a [`ModelSelector`].
//!
//! The selector never calls the selected service. This helper drives the
//! select → attempt → exclude cycle for callers that do, with the attempt
//! supplied as a closure.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::CatalogEntry;
use crate::refresh::elapsed_ms;
use crate::selection::{Selection, UnavailableReason};
use crate::selector::ModelSelector;

/// One failed attempt against a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptError {
    pub candidate: String,
    pub message: String,
}

/// Successful call after zero or more failovers.
#[derive(Debug, Clone)]
pub struct FailoverSuccess<T> {
    pub data: T,
    pub selected: CatalogEntry,
    pub candidate_chain: Vec<String>,
    pub errors: Vec<AttemptError>,
    pub latency_ms: u64,
}

/// Why the loop gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum FailoverStop {
    /// The selector had nothing left to offer.
    Unavailable(UnavailableReason),
    /// The attempt budget ran out while candidates remained.
    AttemptsExhausted,
}

/// Failed call after the loop stopped.
#[derive(Debug, Clone)]
pub struct FailoverFailure {
    pub stop: FailoverStop,
    pub candidate_chain: Vec<String>,
    pub errors: Vec<AttemptError>,
    pub latency_ms: u64,
}

pub type FailoverResult<T> = Result<FailoverSuccess<T>, FailoverFailure>;

/// Runs `attempt` against successive candidates until one succeeds.
///
/// Every candidate whose attempt fails is excluded from `selector`, so the
/// exclusions outlive this call.
pub async fn run_with_failover<T, E, F, Fut>(
    selector: &ModelSelector,
    max_attempts: usize,
    mut attempt: F,
) -> FailoverResult<T>
where
    F: FnMut(CatalogEntry) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let mut candidate_chain = Vec::new();
    let mut errors = Vec::new();

    for _ in 0..max_attempts {
        let entry = match selector.next().await {
            Selection::Candidate(entry) => entry,
            Selection::Unavailable(reason) => {
                warn!(%reason, attempts = candidate_chain.len(), "no candidate left to try");
                return Err(FailoverFailure {
                    stop: FailoverStop::Unavailable(reason),
                    candidate_chain,
                    errors,
                    latency_ms: elapsed_ms(started),
                });
            }
        };

        candidate_chain.push(entry.id.clone());
        match attempt(entry.clone()).await {
            Ok(data) => {
                if !errors.is_empty() {
                    info!(
                        id = %entry.id,
                        failed_attempts = errors.len(),
                        "failover succeeded"
                    );
                }
                return Ok(FailoverSuccess {
                    data,
                    selected: entry,
                    candidate_chain,
                    errors,
                    latency_ms: elapsed_ms(started),
                });
            }
            Err(error) => {
                warn!(id = %entry.id, %error, "candidate failed; excluding");
                errors.push(AttemptError {
                    candidate: entry.id.clone(),
                    message: error.to_string(),
                });
                selector.exclude(&entry.id).await;
            }
        }
    }

    Err(FailoverFailure {
        stop: FailoverStop::AttemptsExhausted,
        candidate_chain,
        errors,
        latency_ms: elapsed_ms(started),
    })
}
