//! Query execution
//!
//! The executor resolves sorting against the shared [`SortFields`] table,
//! then issues the page fetch and the total count for the same predicate
//! concurrently. Both must succeed: a failure of either fails the call.

use crate::core::error::DashboardError;
use crate::core::predicate::Predicate;
use crate::core::query::{Page, PageMeta, Pagination};
use crate::core::sort::SortFields;
use crate::core::store::TransactionStore;
use crate::core::transaction::Transaction;
use std::sync::Arc;

/// Applies predicates to a record store
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn TransactionStore>,
    sort_fields: Arc<SortFields>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn TransactionStore>, sort_fields: Arc<SortFields>) -> Self {
        Self { store, sort_fields }
    }

    /// Fetch one page of matching records with pagination metadata
    ///
    /// `sort_by` and `order` are taken as the client sent them; unknown
    /// values fall back to date, descending.
    pub async fn execute(
        &self,
        predicate: &Predicate,
        sort_by: Option<&str>,
        order: Option<&str>,
        pagination: Pagination,
    ) -> Result<Page<Transaction>, DashboardError> {
        let sort = self.sort_fields.sort_spec(sort_by, order);
        let skip = pagination.skip();

        tracing::debug!(
            clauses = predicate.clauses().len(),
            sort_field = %sort.field,
            direction = sort.order.direction(),
            skip,
            limit = pagination.limit,
            "executing transaction query"
        );

        let (data, total) = tokio::try_join!(
            self.store.find(predicate, &sort, skip, pagination.limit),
            self.store.count(predicate),
        )?;

        Ok(Page {
            data,
            meta: PageMeta::new(pagination, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StorageError;
    use crate::core::field::Field;
    use crate::core::sort::{SortOrder, SortSpec};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Store that records what it was asked and can be told to fail
    #[derive(Default)]
    struct RecordingStore {
        seen: Mutex<Vec<(SortSpec, u64, u64)>>,
        fail_find: bool,
        fail_count: bool,
        total: u64,
    }

    #[async_trait]
    impl TransactionStore for RecordingStore {
        async fn find(
            &self,
            _predicate: &Predicate,
            sort: &SortSpec,
            skip: u64,
            limit: u64,
        ) -> Result<Vec<Transaction>, StorageError> {
            self.seen.lock().unwrap().push((*sort, skip, limit));
            if self.fail_find {
                return Err(StorageError::query("mock", "find failed"));
            }
            Ok(Vec::new())
        }

        async fn count(&self, _predicate: &Predicate) -> Result<u64, StorageError> {
            if self.fail_count {
                return Err(StorageError::query("mock", "count failed"));
            }
            Ok(self.total)
        }

        async fn distinct(&self, _field: Field) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }

        async fn insert_many(&self, records: Vec<Transaction>) -> Result<u64, StorageError> {
            Ok(records.len() as u64)
        }

        async fn clear(&self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn executor(store: RecordingStore) -> (QueryExecutor, Arc<RecordingStore>) {
        let store = Arc::new(store);
        let executor = QueryExecutor::new(store.clone(), Arc::new(SortFields::default()));
        (executor, store)
    }

    #[tokio::test]
    async fn test_passes_window_and_fallback_sort() {
        let (executor, store) = executor(RecordingStore {
            total: 25,
            ..Default::default()
        });

        let page = executor
            .execute(
                &Predicate::match_all(),
                Some("bogus"),
                Some("sideways"),
                Pagination { page: 2, limit: 10 },
            )
            .await
            .unwrap();

        assert_eq!(page.meta.total, 25);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.page, 2);
        assert_eq!(
            store.seen.lock().unwrap().as_slice(),
            &[(
                SortSpec {
                    field: Field::MetaDate,
                    order: SortOrder::Desc
                },
                10,
                10
            )]
        );
    }

    #[tokio::test]
    async fn test_count_failure_fails_whole_call() {
        let (executor, _) = executor(RecordingStore {
            fail_count: true,
            ..Default::default()
        });
        let result = executor
            .execute(&Predicate::match_all(), None, None, Pagination { page: 1, limit: 10 })
            .await;
        assert!(matches!(result, Err(DashboardError::Storage(_))));
    }

    #[tokio::test]
    async fn test_find_failure_fails_whole_call() {
        let (executor, _) = executor(RecordingStore {
            fail_find: true,
            total: 3,
            ..Default::default()
        });
        let result = executor
            .execute(&Predicate::match_all(), None, None, Pagination { page: 1, limit: 10 })
            .await;
        assert!(result.is_err());
    }

    /// Both operations wait on the same barrier, so the call only completes
    /// when fetch and count are in flight together.
    struct RendezvousStore {
        barrier: Barrier,
    }

    #[async_trait]
    impl TransactionStore for RendezvousStore {
        async fn find(
            &self,
            _predicate: &Predicate,
            _sort: &SortSpec,
            _skip: u64,
            _limit: u64,
        ) -> Result<Vec<Transaction>, StorageError> {
            self.barrier.wait().await;
            Ok(Vec::new())
        }

        async fn count(&self, _predicate: &Predicate) -> Result<u64, StorageError> {
            self.barrier.wait().await;
            Ok(0)
        }

        async fn distinct(&self, _field: Field) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }

        async fn insert_many(&self, _records: Vec<Transaction>) -> Result<u64, StorageError> {
            Ok(0)
        }

        async fn clear(&self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_fetch_and_count_run_concurrently() {
        let executor = QueryExecutor::new(
            Arc::new(RendezvousStore {
                barrier: Barrier::new(2),
            }),
            Arc::new(SortFields::default()),
        );

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            executor.execute(&Predicate::match_all(), None, None, Pagination { page: 1, limit: 10 }),
        )
        .await;

        assert!(result.is_ok(), "fetch and count were not joined concurrently");
    }
}
