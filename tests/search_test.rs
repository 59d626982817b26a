#[path = "common/mod.rs"]
mod common;

use std::time::Duration;

use common::ScriptedSearch;
use joinmatch::api::ApiError;
use joinmatch::search::{DEFAULT_DEBOUNCE, DebouncedSearch, SearchOutcome};

fn echo_after(delay: Duration) -> (ScriptedSearch<String>, common::CallLog<String>) {
    ScriptedSearch::new(move |query| (delay, Ok(vec![format!("result for {query}")])))
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_sends_one_request() {
    let (backend, calls) = echo_after(Duration::ZERO);
    let search = DebouncedSearch::new(backend);

    let a = search.set_query("a").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let ab = search.set_query("ab").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let abc = search.set_query("abc").unwrap();

    assert_eq!(search.query(), "abc");
    assert!(search.results().is_empty());

    assert_eq!(a.await.unwrap(), SearchOutcome::Skipped);
    assert_eq!(ab.await.unwrap(), SearchOutcome::Skipped);
    assert_eq!(abc.await.unwrap(), SearchOutcome::Applied { count: 1 });

    assert_eq!(calls.all(), vec!["abc".to_string()]);
    assert_eq!(search.results(), vec!["result for abc".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_waits_for_full_window() {
    let (backend, calls) = echo_after(Duration::ZERO);
    let search = DebouncedSearch::new(backend);

    let pending = search.set_query("kasia").unwrap();
    tokio::time::sleep(DEFAULT_DEBOUNCE - Duration::from_millis(1)).await;
    assert_eq!(calls.count(), 0);

    pending.await.unwrap();
    assert_eq!(calls.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_window() {
    let (backend, calls) = echo_after(Duration::ZERO);
    let search = DebouncedSearch::with_window(backend, Duration::from_millis(50));

    search.set_query("x").unwrap().await.unwrap();
    assert_eq!(calls.count(), 1);
    assert_eq!(search.window(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_slow_old_response_is_discarded() {
    let (backend, calls) = ScriptedSearch::new(|query| {
        let delay = if query == "jo" {
            Duration::from_secs(2)
        } else {
            Duration::from_millis(10)
        };
        (delay, Ok(vec![query.to_uppercase()]))
    });
    let search = DebouncedSearch::new(backend);

    let first = search.set_query("jo").unwrap();
    // Let the first query dispatch, then type more while it is in flight
    tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(5)).await;
    assert!(search.is_searching());
    let second = search.set_query("john").unwrap();

    assert_eq!(
        second.await.unwrap(),
        SearchOutcome::Applied { count: 1 }
    );
    assert_eq!(search.results(), vec!["JOHN".to_string()]);

    assert_eq!(first.await.unwrap(), SearchOutcome::Stale);
    assert_eq!(search.results(), vec!["JOHN".to_string()]);
    assert_eq!(
        search.snapshot().last_dispatched_query.as_deref(),
        Some("john")
    );
    assert_eq!(calls.all(), vec!["jo".to_string(), "john".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_blank_query_discards_in_flight_response() {
    let (backend, calls) = echo_after(Duration::from_secs(1));
    let search = DebouncedSearch::new(backend);

    let pending = search.set_query("marek").unwrap();
    tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(5)).await;
    assert_eq!(calls.count(), 1);

    assert!(search.set_query("").is_none());
    assert_eq!(pending.await.unwrap(), SearchOutcome::Stale);

    let state = search.snapshot();
    assert!(state.results.is_empty());
    assert!(state.query.is_empty());
    assert_eq!(calls.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_blank_query_cancels_pending_timer() {
    let (backend, calls) = echo_after(Duration::ZERO);
    let search = DebouncedSearch::new(backend);

    let pending = search.set_query("ola").unwrap();
    assert!(search.set_query("  ").is_none());

    assert_eq!(pending.await.unwrap(), SearchOutcome::Skipped);
    assert_eq!(calls.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_error_keeps_previous_results() {
    let (backend, _calls) = ScriptedSearch::new(|query| {
        if query == "bad" {
            (Duration::ZERO, Err(ApiError::network("timed out")))
        } else {
            (Duration::ZERO, Ok(vec![query.to_string()]))
        }
    });
    let search = DebouncedSearch::new(backend);

    search.set_query("good").unwrap().await.unwrap();
    assert_eq!(search.results(), vec!["good".to_string()]);

    let outcome = search.set_query("bad").unwrap().await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Failed(ref m) if m.contains("timed out")));

    let state = search.snapshot();
    assert_eq!(state.results, vec!["good".to_string()]);
    assert!(state.error_message.is_some());
    assert!(!state.is_searching);

    search.set_query("good again").unwrap().await.unwrap();
    assert!(search.snapshot().error_message.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_flush_skips_the_window() {
    let (backend, calls) = echo_after(Duration::ZERO);
    let search = DebouncedSearch::new(backend);

    let pending = search.set_query("iga").unwrap();
    assert_eq!(search.flush().await, SearchOutcome::Applied { count: 1 });
    assert_eq!(calls.count(), 1);

    assert_eq!(pending.await.unwrap(), SearchOutcome::Skipped);
    assert_eq!(calls.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_tokens_increase_per_dispatch() {
    let (backend, _calls) = echo_after(Duration::ZERO);
    let search = DebouncedSearch::new(backend);

    search.set_query("a").unwrap().await.unwrap();
    let first = search.snapshot().request_token;
    search.set_query("b").unwrap().await.unwrap();
    let second = search.snapshot().request_token;

    assert!(second > first);
}
