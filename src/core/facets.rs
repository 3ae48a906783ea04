//! Facet aggregation
//!
//! Facets are the distinct values of the filterable fields across the whole
//! store. They are never narrowed by the caller's current selection.

use crate::core::error::{DashboardError, StorageError};
use crate::core::field::Field;
use crate::core::store::TransactionStore;
use serde::Serialize;
use std::sync::Arc;

/// Distinct values usable as filter choices, each sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    pub payment_methods: Vec<String>,
    pub tags: Vec<String>,
}

/// Computes [`Facets`] from a record store
#[derive(Clone)]
pub struct FacetAggregator {
    store: Arc<dyn TransactionStore>,
}

impl FacetAggregator {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Compute all four facets concurrently; any failure fails the call
    pub async fn facets(&self) -> Result<Facets, DashboardError> {
        let (regions, categories, payment_methods, tags) = tokio::try_join!(
            self.distinct(Field::CustomerRegion),
            self.distinct(Field::ProductCategory),
            self.distinct(Field::MetaPaymentMethod),
            self.distinct(Field::ProductTags),
        )?;

        Ok(Facets {
            regions,
            categories,
            payment_methods,
            tags,
        })
    }

    async fn distinct(&self, field: Field) -> Result<Vec<String>, StorageError> {
        let mut values = self.store.distinct(field).await?;
        values.sort();
        values.dedup();
        Ok(values)
    }
}
