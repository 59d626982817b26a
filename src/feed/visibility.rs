//! Loading driven by a sentinel's visibility.
//!
//! The view reports whether the sentinel at the end of the list is on
//! screen. [`VisibilityTrigger`] turns that into at most one load intent per
//! appearance; [`VisibilityLoader`] forwards the intent to a
//! [`ListController`], which decides whether a request actually goes out.

use futures::{Stream, StreamExt};
use tracing::trace;

use super::controller::{ListController, ListPhase, PageLoad};
use super::page::PageFetcher;
use crate::filters::FilterGate;

/// Edge detector for sentinel visibility.
#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    visible: bool,
    armed: bool,
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self {
            visible: false,
            armed: true,
        }
    }
}

impl VisibilityTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visibility observation. Returns true when a load should be
    /// requested: the sentinel is visible, the trigger is armed and more
    /// data can be loaded. Firing disarms the trigger until the sentinel
    /// leaves the viewport or [`rearm`](Self::rearm) is called.
    pub fn observe(&mut self, visible: bool, can_load_more: bool) -> bool {
        self.visible = visible;
        if !visible {
            self.armed = true;
            return false;
        }
        if !self.armed || !can_load_more {
            return false;
        }
        self.armed = false;
        true
    }

    /// Allow the next visible observation to fire again.
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Binds a [`VisibilityTrigger`] to a list controller.
pub struct VisibilityLoader<P: PageFetcher> {
    controller: ListController<P>,
    trigger: VisibilityTrigger,
    gate: Option<FilterGate>,
}

impl<P: PageFetcher> VisibilityLoader<P> {
    pub fn new(controller: ListController<P>) -> Self {
        Self {
            controller,
            trigger: VisibilityTrigger::new(),
            gate: None,
        }
    }

    /// Only load while the controller's filters pass `gate`.
    pub fn with_gate(mut self, gate: FilterGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn controller(&self) -> &ListController<P> {
        &self.controller
    }

    pub fn can_load_more(&self) -> bool {
        if !self.controller.has_more() {
            return false;
        }
        match &self.gate {
            Some(gate) => gate(&self.controller.filters()),
            None => true,
        }
    }

    /// Feed one visibility observation; returns the load to run, if any.
    pub fn observe(&mut self, visible: bool) -> Option<PageLoad<P>> {
        let can_load_more = self.can_load_more();
        if !self.trigger.observe(visible, can_load_more) {
            return None;
        }
        let load = self.controller.load_next();
        if load.is_none() {
            trace!(
                "{}: sentinel visible while a load is running",
                self.controller.label()
            );
        }
        load
    }

    pub fn rearm(&mut self) {
        self.trigger.rearm();
    }

    /// Drive the loader from a stream of visibility observations until the
    /// stream ends.
    ///
    /// Loads are spawned on the runtime. When a load settles successfully
    /// and the sentinel is still visible, the next page is requested right
    /// away. A failed load only re-arms; the next appearance retries.
    pub async fn run<S>(mut self, visibility: S)
    where
        S: Stream<Item = bool> + Unpin,
    {
        let mut visibility = visibility;
        let mut phases = self.controller.subscribe();

        loop {
            tokio::select! {
                event = visibility.next() => {
                    let Some(visible) = event else {
                        break;
                    };
                    if let Some(load) = self.observe(visible) {
                        load.spawn();
                    }
                }
                changed = phases.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let phase = *phases.borrow_and_update();
                    match phase {
                        ListPhase::LoadingFirst | ListPhase::LoadingMore => {}
                        ListPhase::Error | ListPhase::Exhausted => self.rearm(),
                        ListPhase::Idle => {
                            self.rearm();
                            if self.trigger.is_visible()
                                && let Some(load) = self.observe(true)
                            {
                                load.spawn();
                            }
                        }
                    }
                }
            }
        }
    }
}
