//! Record store trait
//!
//! A [`TransactionStore`] is the only thing the query layer talks to. It
//! receives an already-built [`Predicate`] and a resolved [`SortSpec`], and
//! must apply them exactly:
//!
//! - `find` returns the records matching the predicate, ordered by the sort
//!   field then by id ascending, after skipping `skip` and keeping at most
//!   `limit`.
//! - `count` returns how many records match the predicate.
//! - `distinct` returns each distinct string value a field takes across all
//!   records; for list fields every item counts.
//!
//! `insert_many` and `clear` exist for the bulk importer only.

use crate::core::error::StorageError;
use crate::core::field::Field;
use crate::core::predicate::Predicate;
use crate::core::sort::SortSpec;
use crate::core::transaction::Transaction;
use async_trait::async_trait;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Fetch one window of matching records
    async fn find(
        &self,
        predicate: &Predicate,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, StorageError>;

    /// Count matching records
    async fn count(&self, predicate: &Predicate) -> Result<u64, StorageError>;

    /// Distinct values of a field across the whole store
    async fn distinct(&self, field: Field) -> Result<Vec<String>, StorageError>;

    /// Insert a batch of records, returning how many were written
    async fn insert_many(&self, records: Vec<Transaction>) -> Result<u64, StorageError>;

    /// Remove every record
    async fn clear(&self) -> Result<(), StorageError>;
}
