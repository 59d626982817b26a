//! Restarting a list whenever its filters change.

use tracing::debug;

use super::controller::{ListController, PageLoad};
use super::page::PageFetcher;
use crate::filters::{FilterGate, FilterState};

/// Owns the current filters of a list view.
///
/// Every change restarts pagination from page 0, even when the new filters
/// equal the old ones. The list therefore never mixes items from two filter
/// states.
pub struct FilterCoordinator<P: PageFetcher> {
    controller: ListController<P>,
    filters: FilterState,
    gate: Option<FilterGate>,
}

impl<P: PageFetcher> FilterCoordinator<P> {
    pub fn new(controller: ListController<P>, initial: FilterState) -> Self {
        Self {
            controller,
            filters: initial,
            gate: None,
        }
    }

    /// Filters failing `gate` clear the list instead of loading it.
    pub fn with_gate(mut self, gate: FilterGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn controller(&self) -> &ListController<P> {
        &self.controller
    }

    pub fn is_satisfied(&self) -> bool {
        self.gate.as_ref().is_none_or(|gate| gate(&self.filters))
    }

    /// Replace the filters and restart the list.
    ///
    /// Returns the page-0 load, or `None` when the gate rejected the filters
    /// and the list was only cleared.
    pub fn set_filters(&mut self, filters: FilterState) -> Option<PageLoad<P>> {
        self.filters = filters;
        self.restart()
    }

    /// Derive new filters from the current ones and restart the list.
    pub fn update<F>(&mut self, change: F) -> Option<PageLoad<P>>
    where
        F: FnOnce(FilterState) -> FilterState,
    {
        let next = change(self.filters.clone());
        self.set_filters(next)
    }

    /// Restart with the current filters (first mount, manual refresh).
    pub fn refresh(&mut self) -> Option<PageLoad<P>> {
        self.restart()
    }

    fn restart(&mut self) -> Option<PageLoad<P>> {
        if self.is_satisfied() {
            Some(self.controller.reset(self.filters.clone()))
        } else {
            debug!(
                "{}: filters {} incomplete, clearing list",
                self.controller.label(),
                self.filters
            );
            self.controller.clear(self.filters.clone());
            None
        }
    }
}
