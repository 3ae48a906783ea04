//! Typed filter parameters
//!
//! Query strings arrive as loose text. Every dimension is parsed here into a
//! typed optional field, so nothing unusable reaches the predicate builder.
//!
//! Coercion policy: a value that cannot be parsed is treated as absent. A
//! non-numeric `minAge` imposes no lower bound, an unreadable `endDate`
//! imposes no upper bound, and so on. Coercions are logged at debug level.
//! Fractional ages are accepted and tightened to whole years: `minAge=69.5`
//! means 70 and up, `maxAge=40.5` means 40 and below.
//!
//! Accepted date forms are RFC 3339 (`2024-01-31T12:00:00Z`), a naive
//! date-time taken as UTC (`2024-01-31T12:00:00`, or `2024-01-31T12:00`
//! without seconds), and a bare date (`2024-01-31`). A bare `startDate` means the start of that day; a bare
//! `endDate` means the last millisecond of that day, so the whole end day is
//! included.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

/// Every filter dimension the dashboard understands
///
/// All fields are optional. `None` means the dimension imposes no constraint.
///
/// # Example
/// ```text
/// GET /api/transactions?search=ra&region=North,South&minAge=25&startDate=2024-01-01
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    /// Case-insensitive substring over customer name and phone
    #[serde(deserialize_with = "search_text")]
    pub search: Option<String>,

    /// Comma-joined multi-select over `customer.region`
    #[serde(deserialize_with = "multi_select")]
    pub region: Option<Vec<String>>,

    /// Comma-joined multi-select over `customer.gender`
    #[serde(deserialize_with = "multi_select")]
    pub gender: Option<Vec<String>>,

    /// Comma-joined multi-select over `product.category`
    #[serde(deserialize_with = "multi_select")]
    pub category: Option<Vec<String>>,

    /// Comma-joined multi-select over `meta.paymentMethod`
    #[serde(deserialize_with = "multi_select")]
    pub payment_method: Option<Vec<String>>,

    /// Comma-joined multi-select over `product.tags` (any tag matches)
    #[serde(deserialize_with = "multi_select")]
    pub tags: Option<Vec<String>>,

    /// Inclusive lower bound on `customer.age`
    #[serde(deserialize_with = "lower_age_bound")]
    pub min_age: Option<i64>,

    /// Inclusive upper bound on `customer.age`
    #[serde(deserialize_with = "upper_age_bound")]
    pub max_age: Option<i64>,

    /// Inclusive lower bound on `meta.date`
    #[serde(deserialize_with = "start_of_range")]
    pub start_date: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `meta.date`
    #[serde(deserialize_with = "end_of_range")]
    pub end_date: Option<DateTime<Utc>>,
}

impl FilterParams {
    /// True when no dimension is constrained
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Query keys that carry a comma-joined multi-select
///
/// A repeated multi-select key adds to the selection instead of replacing it.
pub const MULTI_SELECT_KEYS: [&str; 5] = ["region", "gender", "category", "paymentMethod", "tags"];

/// Split a comma-joined selection, dropping blank items
///
/// Returns `None` when nothing is left, so an empty selection never turns
/// into "match nothing".
pub fn split_selection(raw: &str) -> Option<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() { None } else { Some(items) }
}

/// Parse an integer parameter, ignoring anything that is not one
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(value = raw, "ignoring non-integer query parameter");
            None
        }
    }
}

/// Which end of a range a loose value should tighten towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Lower,
    Upper,
}

/// Parse a numeric bound over an integer attribute
///
/// Any finite number is accepted. A fractional lower bound rounds up and a
/// fractional upper bound rounds down, so the integer range admits exactly
/// the values the fractional one would.
pub fn parse_numeric_bound(raw: &str, side: BoundSide) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(match side {
            BoundSide::Lower => value.ceil() as i64,
            BoundSide::Upper => value.floor() as i64,
        }),
        _ => {
            tracing::debug!(value = raw, "ignoring non-numeric query parameter");
            None
        }
    }
}

/// Which end of a date range a bare date should snap to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEdge {
    Start,
    End,
}

/// Parse a timestamp in any accepted form
pub fn parse_timestamp(raw: &str, edge: DayEdge) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let time = match edge {
            DayEdge::Start => NaiveTime::MIN,
            DayEdge::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
        };
        return Some(date.and_time(time).and_utc());
    }

    tracing::debug!(value = raw, "ignoring unparseable date query parameter");
    None
}

fn raw_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

fn search_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn multi_select<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?.and_then(|s| split_selection(&s)))
}

pub(crate) fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?.and_then(|s| parse_integer(&s)))
}

fn lower_age_bound<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?.and_then(|s| parse_numeric_bound(&s, BoundSide::Lower)))
}

fn upper_age_bound<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?.and_then(|s| parse_numeric_bound(&s, BoundSide::Upper)))
}

fn start_of_range<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?.and_then(|s| parse_timestamp(&s, DayEdge::Start)))
}

fn end_of_range<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?.and_then(|s| parse_timestamp(&s, DayEdge::End)))
}
