//! Sort key resolution
//!
//! [`SortFields`] maps the sort keys a client may send to the fields they
//! order by. It is built once at startup and shared read-only. A key that is
//! not in the table is not an error: it resolves to the table's default.

use crate::core::field::Field;
use std::collections::BTreeMap;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Only `asc` sorts ascending; anything else, including nothing, is descending
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// Numeric direction as document stores spell it
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// A resolved sort: primary field and direction
///
/// Records with equal primary keys are ordered by id ascending, so repeated
/// identical queries page through an unchanged store identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub order: SortOrder,
}

/// Immutable table of allowed sort keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFields {
    entries: BTreeMap<String, Field>,
    default_key: String,
}

impl SortFields {
    /// Build a table from `(key, field)` entries
    ///
    /// `default_key` must name one of the entries; if it does not, the first
    /// entry in key order becomes the default.
    pub fn new<I, K>(entries: I, default_key: &str) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        let entries: BTreeMap<String, Field> =
            entries.into_iter().map(|(k, f)| (k.into(), f)).collect();

        let default_key = if entries.contains_key(default_key) {
            default_key.to_string()
        } else {
            entries.keys().next().cloned().unwrap_or_default()
        };

        Self {
            entries,
            default_key,
        }
    }

    /// The field a key sorts by, falling back to the default
    pub fn resolve(&self, key: Option<&str>) -> Field {
        key.and_then(|k| self.entries.get(k))
            .or_else(|| self.entries.get(&self.default_key))
            .copied()
            .unwrap_or(Field::MetaDate)
    }

    /// Resolve a client's `sortBy` and `order` together
    pub fn sort_spec(&self, sort_by: Option<&str>, order: Option<&str>) -> SortSpec {
        SortSpec {
            field: self.resolve(sort_by),
            order: SortOrder::parse(order),
        }
    }

    /// The key used when none matches
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// All accepted keys, in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for SortFields {
    fn default() -> Self {
        Self::new(
            [
                ("date", Field::MetaDate),
                ("quantity", Field::SalesQuantity),
                ("name", Field::CustomerName),
            ],
            "date",
        )
    }
}
