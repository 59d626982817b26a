//! Filter state passed to list controllers.
//!
//! A [`FilterState`] is an immutable value: every change produces a new one,
//! and the controller only ever sees the value it was handed in `reset()`.
//! [`EventFilters`] is the typed form of the event browser's inputs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::{JoinMatchError, Result};

/// Query parameter names understood by `GET /event`.
pub mod keys {
    pub const CITY: &str = "city";
    pub const SPORT_TYPE: &str = "sportTypeName";
    pub const DATE_FROM: &str = "dateFrom";
    pub const DATE_TO: &str = "dateTo";
    pub const MIN_PRICE: &str = "minCost";
    pub const MAX_PRICE: &str = "maxCost";
    pub const FREE_ONLY: &str = "free";
    pub const AVAILABLE_ONLY: &str = "available";
    pub const SEARCH: &str = "search";
    pub const SORT_BY: &str = "sortBy";
    pub const DIRECTION: &str = "direction";
}

/// Predicate deciding whether a filter state is complete enough to load.
pub type FilterGate = Arc<dyn Fn(&FilterState) -> bool + Send + Sync>;

/// Gate that only passes when `key` carries a value.
pub fn require(key: &'static str) -> FilterGate {
    Arc::new(move |filters: &FilterState| filters.is_set(key))
}

/// Opaque, ordered key/value mapping of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    params: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key` set. Blank values remove the key instead.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.params.remove(&key);
        } else {
            self.params.insert(key, value.trim().to_string());
        }
        self
    }

    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        let key: String = key.into();
        match value {
            Some(v) => self.with(key, v.to_string()),
            None => self.without(&key),
        }
    }

    /// Return a copy with `key` set to `"true"`, or removed when `flag` is false.
    pub fn with_flag(self, key: impl Into<String>, flag: bool) -> Self {
        let key: String = key.into();
        if flag {
            self.with(key, "true")
        } else {
            self.without(&key)
        }
    }

    pub fn without(mut self, key: &str) -> Self {
        self.params.remove(key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Parameters in key order, ready to append to a query string.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return write!(f, "(none)");
        }
        let mut first = true;
        for (k, v) in &self.params {
            if !first {
                write!(f, "&")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FilterState::new(), |state, (k, v)| state.with(k, v))
    }
}

/// Sort direction as sent in the `direction` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = JoinMatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(JoinMatchError::InvalidInput(format!(
                "unknown sort direction '{s}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// Inputs of the event browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilters {
    pub city: Option<String>,
    pub sport_type: Option<String>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub free_only: bool,
    pub available_only: bool,
    pub search: Option<String>,
    /// Backend field to sort by, e.g. `eventDate`
    pub sort_by: Option<String>,
    pub direction: SortDirection,
}

impl EventFilters {
    /// Reject combinations the backend would answer with an empty page or a 400.
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(JoinMatchError::InvalidInput(format!(
                "date range is reversed: {from} is after {to}"
            )));
        }

        for price in [self.min_price, self.max_price].into_iter().flatten() {
            if !price.is_finite() || price < 0.0 {
                return Err(JoinMatchError::InvalidInput(format!(
                    "price bound must be a non-negative number, got {price}"
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(JoinMatchError::InvalidInput(format!(
                "minimum price {min} exceeds maximum price {max}"
            )));
        }

        Ok(())
    }

    pub fn to_filter_state(&self) -> FilterState {
        let mut state = FilterState::new()
            .with_opt(keys::CITY, self.city.as_deref())
            .with_opt(keys::SPORT_TYPE, self.sport_type.as_deref())
            .with_opt(keys::DATE_FROM, self.date_from)
            .with_opt(keys::DATE_TO, self.date_to)
            .with_opt(keys::MIN_PRICE, self.min_price)
            .with_opt(keys::MAX_PRICE, self.max_price)
            .with_flag(keys::FREE_ONLY, self.free_only)
            .with_flag(keys::AVAILABLE_ONLY, self.available_only)
            .with_opt(keys::SEARCH, self.search.as_deref());

        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
            state = state
                .with(keys::SORT_BY, sort_by)
                .with(keys::DIRECTION, self.direction.as_str());
        }

        state
    }
}

impl From<&EventFilters> for FilterState {
    fn from(filters: &EventFilters) -> Self {
        filters.to_filter_state()
    }
}
