//! Query parameters and pagination utilities

use crate::core::filter::{FilterParams, MULTI_SELECT_KEYS, lenient_integer};
use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page, sort and filter parameters of a list request
///
/// # Example
/// ```text
/// GET /api/transactions?page=2&limit=10
/// GET /api/transactions?sortBy=quantity&order=asc
/// GET /api/transactions?region=North&minAge=25&sortBy=name
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListParams {
    #[serde(flatten)]
    pub filter: FilterParams,

    #[serde(flatten)]
    pub page: PageParams,
}

impl ListParams {
    /// Build parameters from decoded query-string pairs
    ///
    /// Keys are folded one by one, so a repeated or malformed key only
    /// affects its own dimension. Repeated multi-select keys are merged into
    /// one selection (`region=North&region=South` is `region=North,South`);
    /// for any other repeated key the first value wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in pairs {
            match merged.get_mut(&key) {
                Some(existing) if MULTI_SELECT_KEYS.contains(&key.as_str()) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                Some(_) => {
                    tracing::debug!(
                        key = %key,
                        value = %value,
                        "ignoring repeated query parameter"
                    );
                }
                None => {
                    merged.insert(key, value);
                }
            }
        }

        let deserializer = MapDeserializer::<_, ValueError>::new(merged.into_iter());
        Self::deserialize(deserializer).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "ignoring unreadable query parameters");
            Self::default()
        })
    }
}

/// Raw paging and sorting parameters
///
/// Values are kept as the client sent them (after integer parsing) and
/// resolved by [`Pagination::resolve`] and [`crate::core::sort::SortFields`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageParams {
    /// Page number (starts at 1)
    #[serde(deserialize_with = "lenient_integer")]
    pub page: Option<i64>,

    /// Number of items per page
    #[serde(deserialize_with = "lenient_integer")]
    pub limit: Option<i64>,

    /// Sort key: `date`, `quantity` or `name`
    pub sort_by: Option<String>,

    /// `asc` for ascending; anything else sorts descending
    pub order: Option<String>,
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number, at least 1
    pub page: u64,

    /// Items per page, at least 1
    pub limit: u64,
}

impl Pagination {
    /// Resolve raw parameters
    ///
    /// A missing or non-positive page becomes 1. A missing or non-positive
    /// limit becomes `default_limit`. `max_limit`, when set, caps the limit;
    /// without it there is no upper bound.
    pub fn resolve(params: &PageParams, default_limit: u64, max_limit: Option<u64>) -> Self {
        let page = params
            .page
            .filter(|p| *p > 0)
            .map(|p| p as u64)
            .unwrap_or(1);

        let limit = params
            .limit
            .filter(|l| *l > 0)
            .map(|l| l as u64)
            .unwrap_or(default_limit)
            .max(1);

        let limit = match max_limit {
            Some(max) => limit.min(max.max(1)),
            None => limit,
        };

        Self { page, limit }
    }

    /// Number of records before this page
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// The records of this page
    pub data: Vec<T>,

    /// Pagination metadata
    pub meta: PageMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of matching records
    pub total: u64,

    /// Current page number (starts at 1)
    pub page: u64,

    /// Total number of pages
    pub total_pages: u64,

    /// Number of items per page
    pub limit: u64,
}

impl PageMeta {
    pub fn new(pagination: Pagination, total: u64) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = pagination.limit.max(1);
        Self {
            total,
            page: pagination.page,
            total_pages: total.div_ceil(limit),
            limit: pagination.limit,
        }
    }
}
