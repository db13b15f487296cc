//! Behavior-driven tests for the caller failover loop

use std::sync::atomic::{AtomicUsize, Ordering};

use modelgate_tests::*;

#[tokio::test]
async fn when_first_candidate_fails_loop_switches_and_succeeds() {
    // Given: Two usable candidates, the first of which always fails
    let selector = selector_with(ScriptedHttpClient::ok(FREE_FREE_PAID));

    // When: The caller runs its request through the failover loop
    let result = run_with_failover(&selector, 5, |entry| async move {
        if entry.id == "a" {
            Err(format!("{} returned 502", entry.id))
        } else {
            Ok(format!("response from {}", entry.id))
        }
    })
    .await;

    // Then: The second candidate answered and the first is now excluded
    let success = result.expect("failover should succeed");
    assert_eq!(success.data, "response from b");
    assert_eq!(success.selected.id, "b");
    assert_eq!(success.candidate_chain, vec!["a", "b"]);
    assert_eq!(success.errors.len(), 1);
    assert_eq!(success.errors[0].candidate, "a");
    assert_eq!(selector.snapshot().await.excluded, vec!["a"]);
}

#[tokio::test]
async fn when_every_candidate_fails_loop_stops_at_exhaustion() {
    // Given: Two usable candidates that both fail
    let selector = selector_with(ScriptedHttpClient::ok(FREE_FREE_PAID));

    // When: The caller allows more attempts than there are candidates
    let result = run_with_failover(&selector, 10, |entry| async move {
        Err::<(), _>(format!("{} timed out", entry.id))
    })
    .await;

    // Then: The loop stops because nothing is left, not because of the budget
    let failure = result.expect_err("all candidates fail");
    assert_eq!(
        failure.stop,
        FailoverStop::Unavailable(UnavailableReason::Exhausted)
    );
    assert_eq!(failure.candidate_chain, vec!["a", "b"]);
    assert_eq!(failure.errors.len(), 2);
}

#[tokio::test]
async fn when_attempt_budget_runs_out_remaining_candidates_are_left_alone() {
    // Given: Two usable candidates and a budget of one attempt
    let selector = selector_with(ScriptedHttpClient::ok(FREE_FREE_PAID));
    let attempts = AtomicUsize::new(0);

    // When: The single attempt fails
    let result = run_with_failover(&selector, 1, |_| {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>("boom") }
    })
    .await;

    // Then: The loop reports the exhausted budget and b is still usable
    let failure = result.expect_err("budget exhausted");
    assert_eq!(failure.stop, FailoverStop::AttemptsExhausted);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert_eq!(selected_id(selector.next().await), "b");
}

#[tokio::test]
async fn when_catalog_is_empty_no_attempt_is_made() {
    // Given: A catalog endpoint that is down
    let selector = selector_with(ScriptedHttpClient::status(503, ""));
    let attempts = AtomicUsize::new(0);

    // When: The caller runs the loop
    let result = run_with_failover(&selector, 3, |_| {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Ok::<(), String>(()) }
    })
    .await;

    // Then: It stops immediately with an empty-catalog reason
    let failure = result.expect_err("nothing to try");
    assert_eq!(
        failure.stop,
        FailoverStop::Unavailable(UnavailableReason::EmptyCatalog)
    );
    assert!(failure.candidate_chain.is_empty());
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}
