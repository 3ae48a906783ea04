//! Predicate construction
//!
//! [`build_predicate`] turns a [`FilterParams`] into a [`Predicate`]: a list
//! of clauses that a record must all satisfy. Building does no I/O. A
//! predicate can only be made here and is only read by record stores, which
//! translate its clauses into their own query language.

use crate::core::field::Field;
use crate::core::filter::FilterParams;
use chrono::{DateTime, Utc};

/// Fields the free-text search looks in
pub const SEARCH_FIELDS: [Field; 2] = [Field::CustomerName, Field::CustomerPhone];

/// A scalar bound of a range clause
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Integer(i64),
    DateTime(DateTime<Utc>),
}

/// One independent condition
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Case-insensitive literal substring in any of `fields`
    Search { needle: String, fields: Vec<Field> },

    /// Field value is one of `values`; for list fields, any item is
    AnyOf { field: Field, values: Vec<String> },

    /// Inclusive bounds; a missing side is unbounded
    Range {
        field: Field,
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
}

impl Clause {
    /// Regex source matching `needle` literally
    ///
    /// Only meaningful for `Search`; backends apply it case-insensitively.
    pub fn search_pattern(needle: &str) -> String {
        regex::escape(needle)
    }
}

/// The conjunction of clauses a record must satisfy
///
/// An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// A predicate with no clauses
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Build the predicate for a set of filter parameters
///
/// Clause order is fixed: search, multi-selects (region, gender, category,
/// payment method, tags), age range, date range.
pub fn build_predicate(filter: &FilterParams) -> Predicate {
    let mut clauses = Vec::new();

    if let Some(needle) = &filter.search {
        clauses.push(Clause::Search {
            needle: needle.clone(),
            fields: SEARCH_FIELDS.to_vec(),
        });
    }

    let selections = [
        (Field::CustomerRegion, &filter.region),
        (Field::CustomerGender, &filter.gender),
        (Field::ProductCategory, &filter.category),
        (Field::MetaPaymentMethod, &filter.payment_method),
        (Field::ProductTags, &filter.tags),
    ];
    for (field, selected) in selections {
        if let Some(values) = selected {
            clauses.push(Clause::AnyOf {
                field,
                values: values.clone(),
            });
        }
    }

    if filter.min_age.is_some() || filter.max_age.is_some() {
        clauses.push(Clause::Range {
            field: Field::CustomerAge,
            lower: filter.min_age.map(Bound::Integer),
            upper: filter.max_age.map(Bound::Integer),
        });
    }

    if filter.start_date.is_some() || filter.end_date.is_some() {
        clauses.push(Clause::Range {
            field: Field::MetaDate,
            lower: filter.start_date.map(Bound::DateTime),
            upper: filter.end_date.map(Bound::DateTime),
        });
    }

    Predicate { clauses }
}
