//! Debounced type-ahead search.
//!
//! Keystrokes update the query immediately; the backend is only asked once
//! the query has been stable for the debounce window. Every dispatch carries
//! a request token and only the response for the newest token is applied,
//! so a slow answer to an old query can never overwrite a newer one.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::api::ApiError;

/// Quiescence window used unless configured otherwise.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Answers one search query.
pub trait SearchBackend: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Self::Item>, ApiError>> + Send;
}

/// What a view renders for a search box.
#[derive(Debug, Clone)]
pub struct SearchState<R> {
    /// The query as typed, updated on every keystroke
    pub query: String,
    /// Trimmed query of the most recent dispatch
    pub last_dispatched_query: Option<String>,
    pub results: Vec<R>,
    pub is_searching: bool,
    pub request_token: u64,
    pub error_message: Option<String>,
}

impl<R> SearchState<R> {
    fn new() -> Self {
        Self {
            query: String::new(),
            last_dispatched_query: None,
            results: Vec::new(),
            is_searching: false,
            request_token: 0,
            error_message: None,
        }
    }
}

/// Result of one scheduled or flushed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { count: usize },
    /// A newer dispatch or a blank query superseded this response.
    Stale,
    Failed(String),
    /// Nothing was sent: the timer was superseded or the query was blank.
    Skipped,
}

struct Inner<B: SearchBackend> {
    backend: B,
    window: Duration,
    state: Mutex<SearchState<B::Item>>,
    /// Bumped by every query change; a timer only fires for its own value.
    generation: AtomicU64,
}

/// Debounced search controller. Clones share the same state.
pub struct DebouncedSearch<B: SearchBackend> {
    inner: Arc<Inner<B>>,
}

impl<B: SearchBackend> Clone for DebouncedSearch<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: SearchBackend> DebouncedSearch<B> {
    pub fn new(backend: B) -> Self {
        Self::with_window(backend, DEFAULT_DEBOUNCE)
    }

    pub fn with_window(backend: B, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                window,
                state: Mutex::new(SearchState::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Record a keystroke.
    ///
    /// A blank query clears the results right away and returns `None`.
    /// Otherwise a dispatch is scheduled after the debounce window and its
    /// handle returned; it resolves to [`SearchOutcome::Skipped`] if another
    /// `set_query` arrives first. Must be called within a tokio runtime.
    pub fn set_query(&self, query: impl Into<String>) -> Option<JoinHandle<SearchOutcome>> {
        let query = query.into();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.inner.state.lock();
            let blank = query.trim().is_empty();
            state.query = query;

            if blank {
                state.results.clear();
                state.request_token += 1;
                state.is_searching = false;
                state.error_message = None;
                state.last_dispatched_query = None;
                trace!("search cleared at token {}", state.request_token);
                return None;
            }
        }

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            tokio::time::sleep(inner.window).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                return SearchOutcome::Skipped;
            }
            dispatch(&inner).await
        }))
    }

    /// Dispatch the current query now, cancelling any pending timer.
    pub async fn flush(&self) -> SearchOutcome {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        dispatch(&self.inner).await
    }

    pub fn snapshot(&self) -> SearchState<B::Item> {
        self.inner.state.lock().clone()
    }

    pub fn query(&self) -> String {
        self.inner.state.lock().query.clone()
    }

    pub fn results(&self) -> Vec<B::Item> {
        self.inner.state.lock().results.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.inner.state.lock().is_searching
    }
}

impl<B: SearchBackend> fmt::Debug for DebouncedSearch<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("DebouncedSearch")
            .field("window", &self.inner.window)
            .field("query", &state.query)
            .field("request_token", &state.request_token)
            .field("results", &state.results.len())
            .finish()
    }
}

async fn dispatch<B: SearchBackend>(inner: &Inner<B>) -> SearchOutcome {
    let (token, query) = {
        let mut state = inner.state.lock();
        let query = state.query.trim().to_string();
        if query.is_empty() {
            return SearchOutcome::Skipped;
        }
        state.request_token += 1;
        state.is_searching = true;
        state.last_dispatched_query = Some(query.clone());
        (state.request_token, query)
    };

    debug!("search '{}' dispatched with token {}", query, token);
    let result = inner.backend.search(&query).await;

    let mut state = inner.state.lock();
    if state.request_token != token {
        trace!(
            "dropping results for '{}' (token {}, now {})",
            query, token, state.request_token
        );
        return SearchOutcome::Stale;
    }
    state.is_searching = false;

    match result {
        Ok(items) => {
            let count = items.len();
            state.results = items;
            state.error_message = None;
            SearchOutcome::Applied { count }
        }
        Err(err) => {
            warn!("Search for '{}' failed: {}", query, err);
            let message = err.to_string();
            state.error_message = Some(message.clone());
            SearchOutcome::Failed(message)
        }
    }
}
