//! Offset-paginated incremental list loading.
//!
//! This module provides:
//! - [`PageFetcher`], the seam to whatever serves pages
//! - [`ListController`], which accumulates pages and drops stale responses
//! - [`VisibilityLoader`], which turns sentinel visibility into loads
//! - [`FilterCoordinator`], which restarts the list on every filter change

pub mod controller;
pub mod coordinator;
pub mod page;
pub mod visibility;

pub use controller::{ListController, ListPhase, ListState, LoadKind, LoadOutcome, PageLoad};
pub use coordinator::FilterCoordinator;
pub use page::{PageFetcher, PageRequest, PageResult};
pub use visibility::{VisibilityLoader, VisibilityTrigger};
