//! Page requests, page results and the fetcher seam.

use std::future::Future;

use crate::api::ApiError;
use crate::error::{JoinMatchError, Result};
use crate::filters::FilterState;

/// One offset-paginated request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub(crate) page_index: u32,
    pub(crate) page_size: u32,
    pub(crate) filters: FilterState,
}

impl PageRequest {
    pub fn new(page_index: u32, page_size: u32, filters: FilterState) -> Result<Self> {
        if page_size == 0 {
            return Err(JoinMatchError::InvalidInput(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            page_index,
            page_size,
            filters,
        })
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }
}

/// Items of one page plus the end-of-data signal.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub is_last_page: bool,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, is_last_page: bool) -> Self {
        Self {
            items,
            is_last_page,
        }
    }
}

/// Fetches one page of items.
///
/// Implementations must be safe to call again with the same request: a
/// failed page is re-requested as is. No retries happen at this layer.
pub trait PageFetcher: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = std::result::Result<PageResult<Self::Item>, ApiError>> + Send;
}
