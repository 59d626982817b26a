//! The backend's page envelope.

use serde::{Deserialize, Serialize};

use crate::feed::PageResult;

/// Spring-style page wrapper returned by every paginated endpoint.
///
/// Only `content` and `last` drive loading; the remaining counters are kept
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based index of this page
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    pub last: bool,
    #[serde(default)]
    pub number_of_elements: u32,
    #[serde(default)]
    pub empty: bool,
}

impl<T> PageEnvelope<T> {
    pub fn into_page_result(self) -> PageResult<T> {
        PageResult {
            items: self.content,
            is_last_page: self.last,
        }
    }
}

impl<T> From<PageEnvelope<T>> for PageResult<T> {
    fn from(envelope: PageEnvelope<T>) -> Self {
        envelope.into_page_result()
    }
}
