//! In-memory implementation of TransactionStore for testing and development

use crate::core::error::StorageError;
use crate::core::field::{Field, FieldValue};
use crate::core::predicate::{Bound, Clause, Predicate};
use crate::core::sort::{SortOrder, SortSpec};
use crate::core::store::TransactionStore;
use crate::core::transaction::Transaction;
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard};

const BACKEND: &str = "in-memory";

/// In-memory transaction store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Predicates are evaluated record by record.
#[derive(Clone, Default)]
pub struct InMemoryTransactionStore {
    records: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`
    pub fn with_records(records: Vec<Transaction>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Transaction>>, StorageError> {
        self.records
            .read()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire read lock: {}", e)))
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find(
        &self,
        predicate: &Predicate,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, StorageError> {
        let matcher = Matcher::compile(predicate)?;
        let records = self.read()?;

        let mut matched: Vec<&Transaction> =
            records.iter().filter(|tx| matcher.matches(tx)).collect();
        matched.sort_by(|a, b| compare(a, b, sort));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, StorageError> {
        let matcher = Matcher::compile(predicate)?;
        let records = self.read()?;
        Ok(records.iter().filter(|tx| matcher.matches(tx)).count() as u64)
    }

    async fn distinct(&self, field: Field) -> Result<Vec<String>, StorageError> {
        let records = self.read()?;
        let values: BTreeSet<&str> = records
            .iter()
            .flat_map(|tx| field.value_of(tx).texts())
            .collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }

    async fn insert_many(&self, batch: Vec<Transaction>) -> Result<u64, StorageError> {
        let mut records = self.records.write().map_err(|e| {
            StorageError::query(BACKEND, format!("Failed to acquire write lock: {}", e))
        })?;
        let inserted = batch.len() as u64;
        records.extend(batch);
        Ok(inserted)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut records = self.records.write().map_err(|e| {
            StorageError::query(BACKEND, format!("Failed to acquire write lock: {}", e))
        })?;
        records.clear();
        Ok(())
    }
}

/// Sort field in the requested direction, then id ascending
fn compare(a: &Transaction, b: &Transaction, sort: &SortSpec) -> Ordering {
    let primary = sort.field.value_of(a).compare(&sort.field.value_of(b));
    let primary = match sort.order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// A predicate prepared for repeated evaluation
struct Matcher<'p> {
    clauses: Vec<Compiled<'p>>,
}

enum Compiled<'p> {
    Search { regex: Regex, fields: &'p [Field] },
    AnyOf { field: Field, values: &'p [String] },
    Range {
        field: Field,
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
}

impl<'p> Matcher<'p> {
    fn compile(predicate: &'p Predicate) -> Result<Self, StorageError> {
        let clauses = predicate
            .clauses()
            .iter()
            .map(|clause| match clause {
                Clause::Search { needle, fields } => {
                    let regex = RegexBuilder::new(&Clause::search_pattern(needle))
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| StorageError::query(BACKEND, e))?;
                    Ok(Compiled::Search { regex, fields })
                }
                Clause::AnyOf { field, values } => Ok(Compiled::AnyOf {
                    field: *field,
                    values,
                }),
                Clause::Range {
                    field,
                    lower,
                    upper,
                } => Ok(Compiled::Range {
                    field: *field,
                    lower: *lower,
                    upper: *upper,
                }),
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        Ok(Self { clauses })
    }

    fn matches(&self, tx: &Transaction) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Compiled::Search { regex, fields } => fields
                .iter()
                .filter_map(|f| f.value_of(tx).as_text())
                .any(|text| regex.is_match(text)),
            Compiled::AnyOf { field, values } => field
                .value_of(tx)
                .texts()
                .iter()
                .any(|text| values.iter().any(|v| v == text)),
            Compiled::Range {
                field,
                lower,
                upper,
            } => {
                let value = field.value_of(tx);
                lower.is_none_or(|b| compare_to_bound(&value, &b).is_some_and(Ordering::is_ge))
                    && upper
                        .is_none_or(|b| compare_to_bound(&value, &b).is_some_and(Ordering::is_le))
            }
        })
    }
}

fn compare_to_bound(value: &FieldValue<'_>, bound: &Bound) -> Option<Ordering> {
    match (value, bound) {
        (FieldValue::Integer(v), Bound::Integer(b)) => Some(v.cmp(b)),
        (FieldValue::DateTime(v), Bound::DateTime(b)) => Some(v.cmp(b)),
        _ => None,
    }
}
