//! Access to the JoinMatch REST backend.
//!
//! This module provides the HTTP transport seam, the client that builds
//! authenticated requests, the page envelope shared by every paginated
//! endpoint, and the endpoint wrappers used by list and search controllers.

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod models;
pub mod transport;

pub use client::BackendClient;
pub use endpoints::{EndpointFeed, EventFeed, ReportedEventFeed, UserSearch};
pub use envelope::PageEnvelope;
pub use error::{ApiError, ApiErrorKind};
pub use models::{EventSummary, RankingEntry, RankingKind, ReportedEvent, UserSummary};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
