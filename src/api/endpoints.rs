//! Endpoint wrappers: paginated feeds, flat lookups and moderator actions.

use std::marker::PhantomData;
use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::client::BackendClient;
use super::models::{EventSummary, RankingEntry, RankingKind, ReportedEvent, UserSummary};
use super::transport::{HttpTransport, ReqwestTransport};
use super::ApiError;
use crate::feed::{PageFetcher, PageRequest, PageResult};
use crate::search::SearchBackend;

pub const EVENTS_PATH: &str = "/event";
pub const REPORTED_EVENTS_PATH: &str = "/moderator/reportEvents";
pub const MODERATOR_USERS_PATH: &str = "/moderator/users";
pub const USER_SEARCH_PATH: &str = "/auth/search";
pub const RANKINGS_PATH: &str = "/rankings";

/// A paginated endpoint returning a page envelope of `I`.
pub struct EndpointFeed<I, T: HttpTransport = ReqwestTransport> {
    client: Arc<BackendClient<T>>,
    path: String,
    _item: PhantomData<fn() -> I>,
}

/// The public event browser.
pub type EventFeed<T = ReqwestTransport> = EndpointFeed<EventSummary, T>;

/// The moderator's reported-events queue.
pub type ReportedEventFeed<T = ReqwestTransport> = EndpointFeed<ReportedEvent, T>;

impl<I, T: HttpTransport> EndpointFeed<I, T> {
    pub fn new(client: Arc<BackendClient<T>>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _item: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<T: HttpTransport> EndpointFeed<EventSummary, T> {
    pub fn events(client: Arc<BackendClient<T>>) -> Self {
        Self::new(client, EVENTS_PATH)
    }
}

impl<T: HttpTransport> EndpointFeed<ReportedEvent, T> {
    pub fn reported_events(client: Arc<BackendClient<T>>) -> Self {
        Self::new(client, REPORTED_EVENTS_PATH)
    }
}

impl<I, T> PageFetcher for EndpointFeed<I, T>
where
    I: DeserializeOwned + Clone + Send + Sync + 'static,
    T: HttpTransport + 'static,
{
    type Item = I;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<I>, ApiError> {
        self.client.get_page(&self.path, request).await
    }
}

/// Debounced user search backed by `/auth/search`.
pub struct UserSearch<T: HttpTransport = ReqwestTransport> {
    client: Arc<BackendClient<T>>,
}

impl<T: HttpTransport> UserSearch<T> {
    pub fn new(client: Arc<BackendClient<T>>) -> Self {
        Self { client }
    }
}

impl<T: HttpTransport + 'static> SearchBackend for UserSearch<T> {
    type Item = UserSummary;

    async fn search(&self, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        self.client.search_users(query).await
    }
}

impl<T: HttpTransport> BackendClient<T> {
    /// Search users by name. The current user is sent as `senderId` so the
    /// backend can annotate relationship state.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let sender_id = self.auth().current_user().map(|u| u.id.to_string());

        let mut params = vec![("query", query)];
        if let Some(id) = sender_id.as_deref() {
            params.push(("senderId", id));
        }

        self.get_json(USER_SEARCH_PATH, &params).await
    }

    /// Fetch the top `limit` entries of a leaderboard.
    pub async fn rankings(
        &self,
        kind: RankingKind,
        limit: u32,
    ) -> Result<Vec<RankingEntry>, ApiError> {
        let path = format!("{RANKINGS_PATH}/{}", kind.path_segment());
        let limit = limit.to_string();
        self.get_json(&path, &[("limit", limit.as_str())]).await
    }

    pub async fn accept_event_report(&self, report_id: i64) -> Result<(), ApiError> {
        let path = format!("{REPORTED_EVENTS_PATH}/{report_id}/accept");
        self.moderate(&path, "accept event report").await
    }

    pub async fn reject_event_report(&self, report_id: i64) -> Result<(), ApiError> {
        let path = format!("{REPORTED_EVENTS_PATH}/{report_id}/reject");
        self.moderate(&path, "reject event report").await
    }

    pub async fn block_user(&self, user_id: i64) -> Result<(), ApiError> {
        let path = format!("{MODERATOR_USERS_PATH}/{user_id}/block");
        self.moderate(&path, "block user").await
    }

    async fn moderate(&self, path: &str, action: &str) -> Result<(), ApiError> {
        match self.send_action(Method::POST, path).await {
            Ok(()) => {
                debug!("{action}: {path} ok");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to {action}: {err}");
                Err(err)
            }
        }
    }
}
