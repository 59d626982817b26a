pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod feed;
pub mod filters;
pub mod search;

pub use api::{ApiError, ApiErrorKind, BackendClient, EventFeed, ReportedEventFeed, UserSearch};
pub use auth::{AuthContext, CurrentUser, StaticSession};
pub use config::Config;
pub use error::{JoinMatchError, Result};
pub use feed::{
    FilterCoordinator, ListController, ListPhase, ListState, LoadOutcome, PageFetcher, PageLoad,
    PageRequest, PageResult, VisibilityLoader, VisibilityTrigger,
};
pub use filters::{EventFilters, FilterState, SortDirection};
pub use search::{DebouncedSearch, SearchBackend, SearchOutcome, SearchState};
