//! The incremental list controller.
//!
//! A [`ListController`] owns the accumulated items of one list view and the
//! cursor bookkeeping around them. Loads are handed out as [`PageLoad`]
//! values that are bound to the epoch they were created in; when a load
//! completes after a `reset()`, its result is dropped. A load that is
//! dropped before it completes releases its loading flag and leaves the
//! list in [`ListPhase::Error`].
//!
//! The phase channel is updated while the state lock is held, so the last
//! value it carries always matches [`ListController::phase`].

use std::fmt;
use std::future::IntoFuture;
use std::mem;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::page::{PageFetcher, PageRequest, PageResult};
use crate::api::ApiError;
use crate::error::{JoinMatchError, Result};
use crate::filters::FilterState;

/// Coarse state of a list, published to subscribers on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    LoadingFirst,
    LoadingMore,
    /// The last page was applied; only `reset()` leaves this phase.
    Exhausted,
    /// The most recent load failed or was cancelled. `load_next()` retries
    /// the same page.
    Error,
}

/// Whether a load started from `reset()` or from `load_next()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    First,
    More,
}

/// What happened when a [`PageLoad`] completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { appended: usize, exhausted: bool },
    /// The list was reset while the request was in flight.
    Stale,
    Failed(String),
}

/// Everything a view needs to render a list.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    /// Items of the current epoch, in page order
    pub accumulated: Vec<T>,
    pub next_page_index: u32,
    pub is_loading_first: bool,
    pub is_loading_more: bool,
    pub is_exhausted: bool,
    pub epoch: u64,
    pub error_message: Option<String>,
    /// Filters the current epoch was started with
    pub filters: FilterState,
}

impl<T> ListState<T> {
    fn new() -> Self {
        Self {
            accumulated: Vec::new(),
            next_page_index: 0,
            is_loading_first: false,
            is_loading_more: false,
            is_exhausted: false,
            epoch: 0,
            error_message: None,
            filters: FilterState::new(),
        }
    }

    pub fn phase(&self) -> ListPhase {
        if self.is_loading_first {
            ListPhase::LoadingFirst
        } else if self.is_loading_more {
            ListPhase::LoadingMore
        } else if self.error_message.is_some() {
            ListPhase::Error
        } else if self.is_exhausted {
            ListPhase::Exhausted
        } else {
            ListPhase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading_first || self.is_loading_more
    }

    /// True when every page loaded and none had items.
    pub fn is_empty_result(&self) -> bool {
        self.is_exhausted && self.accumulated.is_empty() && self.error_message.is_none()
    }
}

struct Shared<P: PageFetcher> {
    fetcher: P,
    page_size: u32,
    /// What the list holds, for log lines ("events", "reports")
    label: &'static str,
    state: Mutex<ListState<P::Item>>,
    phase: watch::Sender<ListPhase>,
}

/// Handle to one incrementally loaded list. Clones share the same state.
pub struct ListController<P: PageFetcher> {
    shared: Arc<Shared<P>>,
}

impl<P: PageFetcher> Clone for ListController<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: PageFetcher> ListController<P> {
    pub fn new(fetcher: P, page_size: u32) -> Result<Self> {
        Self::with_label(fetcher, page_size, "items")
    }

    pub fn with_label(fetcher: P, page_size: u32, label: &'static str) -> Result<Self> {
        if page_size == 0 {
            return Err(JoinMatchError::InvalidInput(
                "page size must be greater than zero".to_string(),
            ));
        }

        let (phase, _) = watch::channel(ListPhase::Idle);
        Ok(Self {
            shared: Arc::new(Shared {
                fetcher,
                page_size,
                label,
                state: Mutex::new(ListState::new()),
                phase,
            }),
        })
    }

    /// Start a new epoch with `filters` and return the load for page 0.
    ///
    /// The state is cleared before this returns. Loads handed out earlier
    /// become stale and will not touch the list when they complete.
    pub fn reset(&self, filters: FilterState) -> PageLoad<P> {
        let mut state = self.shared.state.lock();
        start_epoch(&mut *state, filters.clone());
        state.is_loading_first = true;

        debug!(
            "{}: reset to epoch {} with filters {}",
            self.shared.label, state.epoch, filters
        );

        let load = self.page_load(
            PageRequest {
                page_index: 0,
                page_size: self.shared.page_size,
                filters,
            },
            state.epoch,
            LoadKind::First,
        );
        self.publish(&state);
        load
    }

    /// Start a new epoch without loading anything.
    pub fn clear(&self, filters: FilterState) {
        let mut state = self.shared.state.lock();
        start_epoch(&mut *state, filters);
        debug!("{}: cleared at epoch {}", self.shared.label, state.epoch);
        self.publish(&state);
    }

    /// Return the load for the next page, or `None` if a load is already
    /// running or the list is exhausted.
    pub fn load_next(&self) -> Option<PageLoad<P>> {
        let mut state = self.shared.state.lock();
        if state.is_loading_first || state.is_loading_more || state.is_exhausted {
            trace!(
                "{}: load_next ignored in phase {:?}",
                self.shared.label,
                state.phase()
            );
            return None;
        }
        state.is_loading_more = true;

        let load = self.page_load(
            PageRequest {
                page_index: state.next_page_index,
                page_size: self.shared.page_size,
                filters: state.filters.clone(),
            },
            state.epoch,
            LoadKind::More,
        );
        self.publish(&state);
        Some(load)
    }

    pub fn snapshot(&self) -> ListState<P::Item> {
        self.shared.state.lock().clone()
    }

    pub fn items(&self) -> Vec<P::Item> {
        self.shared.state.lock().accumulated.clone()
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().accumulated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn phase(&self) -> ListPhase {
        self.shared.state.lock().phase()
    }

    /// False once the last page of the current epoch has been applied.
    pub fn has_more(&self) -> bool {
        !self.shared.state.lock().is_exhausted
    }

    pub fn epoch(&self) -> u64 {
        self.shared.state.lock().epoch
    }

    pub fn filters(&self) -> FilterState {
        self.shared.state.lock().filters.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.shared.state.lock().error_message.clone()
    }

    pub fn page_size(&self) -> u32 {
        self.shared.page_size
    }

    pub fn label(&self) -> &'static str {
        self.shared.label
    }

    /// Receive the phase every time it changes.
    pub fn subscribe(&self) -> watch::Receiver<ListPhase> {
        self.shared.phase.subscribe()
    }

    fn apply(
        &self,
        epoch: u64,
        kind: LoadKind,
        page_index: u32,
        result: std::result::Result<PageResult<P::Item>, ApiError>,
    ) -> LoadOutcome {
        let mut state = self.shared.state.lock();
        if state.epoch != epoch {
            trace!(
                "{}: dropping page {} of epoch {} (now {})",
                self.shared.label, page_index, epoch, state.epoch
            );
            return LoadOutcome::Stale;
        }

        match kind {
            LoadKind::First => state.is_loading_first = false,
            LoadKind::More => state.is_loading_more = false,
        }

        let outcome = match result {
            Ok(page) => {
                let exhausted = page.is_last_page;
                let appended = page.items.len();
                state.accumulated.extend(page.items);
                state.next_page_index += 1;
                state.is_exhausted = exhausted;
                state.error_message = None;

                debug!(
                    "{}: applied page {} ({} items, last: {})",
                    self.shared.label, page_index, appended, exhausted
                );
                LoadOutcome::Applied {
                    appended,
                    exhausted,
                }
            }
            Err(err) => {
                warn!(
                    "Failed to fetch page {} of {}: {}",
                    page_index, self.shared.label, err
                );
                let message = err.to_string();
                state.error_message = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        };
        self.publish(&state);
        outcome
    }

    /// Release the flag of a load that was dropped before it completed.
    fn abandon(&self, epoch: u64, kind: LoadKind, page_index: u32) {
        let mut state = self.shared.state.lock();
        if state.epoch != epoch {
            return;
        }
        let was_loading = match kind {
            LoadKind::First => mem::replace(&mut state.is_loading_first, false),
            LoadKind::More => mem::replace(&mut state.is_loading_more, false),
        };
        if !was_loading {
            return;
        }

        warn!(
            "{}: load of page {} cancelled before completing",
            self.shared.label, page_index
        );
        state.error_message = Some(format!("loading page {page_index} was cancelled"));
        self.publish(&state);
    }

    fn page_load(&self, request: PageRequest, epoch: u64, kind: LoadKind) -> PageLoad<P> {
        PageLoad {
            guard: LoadGuard {
                controller: self.clone(),
                epoch,
                kind,
                page_index: request.page_index,
                settled: false,
            },
            request,
        }
    }

    /// Push the phase of `state` to subscribers. Callers hold the state lock
    /// so concurrent updates reach the channel in the order they happened.
    fn publish(&self, state: &ListState<P::Item>) {
        let phase = state.phase();
        self.shared.phase.send_if_modified(|current| {
            if *current == phase {
                false
            } else {
                *current = phase;
                true
            }
        });
    }
}

impl<P: PageFetcher> fmt::Debug for ListController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("ListController")
            .field("label", &self.shared.label)
            .field("page_size", &self.shared.page_size)
            .field("epoch", &state.epoch)
            .field("items", &state.accumulated.len())
            .field("phase", &state.phase())
            .finish()
    }
}

fn start_epoch<T>(state: &mut ListState<T>, filters: FilterState) {
    state.epoch += 1;
    state.accumulated.clear();
    state.next_page_index = 0;
    state.is_exhausted = false;
    state.is_loading_first = false;
    state.is_loading_more = false;
    state.error_message = None;
    state.filters = filters;
}

/// A single page request bound to the epoch it was issued in.
///
/// Await it (or [`spawn`](PageLoad::spawn) it) to run the fetch and apply
/// the result to the list.
///
/// Dropping it, or dropping its future before the fetch returns, cancels
/// the load: the list stops loading and reports [`ListPhase::Error`] so the
/// page can be requested again with `load_next()`.
#[must_use = "a page load does nothing until it is awaited or spawned"]
pub struct PageLoad<P: PageFetcher> {
    request: PageRequest,
    guard: LoadGuard<P>,
}

impl<P: PageFetcher> PageLoad<P> {
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn epoch(&self) -> u64 {
        self.guard.epoch
    }

    pub fn kind(&self) -> LoadKind {
        self.guard.kind
    }

    /// Run the load on the tokio runtime.
    pub fn spawn(self) -> JoinHandle<LoadOutcome> {
        tokio::spawn(self.into_future())
    }
}

impl<P: PageFetcher> IntoFuture for PageLoad<P> {
    type Output = LoadOutcome;
    type IntoFuture = BoxFuture<'static, LoadOutcome>;

    fn into_future(self) -> Self::IntoFuture {
        let PageLoad { request, mut guard } = self;
        async move {
            let result = guard.controller.shared.fetcher.fetch_page(&request).await;
            guard.settled = true;
            guard
                .controller
                .apply(guard.epoch, guard.kind, request.page_index, result)
        }
        .boxed()
    }
}

impl<P: PageFetcher> fmt::Debug for PageLoad<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageLoad")
            .field("request", &self.request)
            .field("epoch", &self.guard.epoch)
            .field("kind", &self.guard.kind)
            .finish()
    }
}

/// Abandons the load on drop unless the fetch result reached `apply`.
struct LoadGuard<P: PageFetcher> {
    controller: ListController<P>,
    epoch: u64,
    kind: LoadKind,
    page_index: u32,
    settled: bool,
}

impl<P: PageFetcher> Drop for LoadGuard<P> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abandon(self.epoch, self.kind, self.page_index);
        }
    }
}
