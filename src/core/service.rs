//! Transaction service
//!
//! The two read operations the dashboard exposes. `list` runs the whole
//! pipeline: filter parameters to predicate, page parameters to a window,
//! then execution. `facets` runs on its own, with no parameters.

use crate::config::QueryConfig;
use crate::core::error::DashboardError;
use crate::core::executor::QueryExecutor;
use crate::core::facets::{FacetAggregator, Facets};
use crate::core::predicate::build_predicate;
use crate::core::query::{ListParams, Page, Pagination};
use crate::core::sort::SortFields;
use crate::core::store::TransactionStore;
use crate::core::transaction::Transaction;
use std::sync::Arc;

/// Read-only query service over a transaction store
///
/// Holds no per-request state; concurrent calls share nothing but the store
/// handle and the immutable sort table.
#[derive(Clone)]
pub struct TransactionService {
    executor: QueryExecutor,
    aggregator: FacetAggregator,
    query: QueryConfig,
}

impl TransactionService {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        sort_fields: Arc<SortFields>,
        query: QueryConfig,
    ) -> Self {
        Self {
            executor: QueryExecutor::new(store.clone(), sort_fields),
            aggregator: FacetAggregator::new(store),
            query,
        }
    }

    /// One filtered, sorted page of transactions
    pub async fn list(&self, params: &ListParams) -> Result<Page<Transaction>, DashboardError> {
        let predicate = build_predicate(&params.filter);
        let pagination =
            Pagination::resolve(&params.page, self.query.default_limit, self.query.max_limit);

        self.executor
            .execute(
                &predicate,
                params.page.sort_by.as_deref(),
                params.page.order.as_deref(),
                pagination,
            )
            .await
    }

    /// Distinct filter choices across the whole store
    pub async fn facets(&self) -> Result<Facets, DashboardError> {
        self.aggregator.facets().await
    }
}
