//! Core module: the record model, predicate building, and query execution

pub mod error;
pub mod executor;
pub mod facets;
pub mod field;
pub mod filter;
pub mod predicate;
pub mod query;
pub mod service;
pub mod sort;
pub mod store;
pub mod transaction;

pub use error::{DashboardError, StorageError};
pub use executor::QueryExecutor;
pub use facets::{FacetAggregator, Facets};
pub use field::{Field, FieldValue};
pub use filter::FilterParams;
pub use predicate::{Predicate, build_predicate};
pub use query::{ListParams, Page, PageMeta, Pagination};
pub use service::TransactionService;
pub use sort::{SortFields, SortOrder, SortSpec};
pub use store::TransactionStore;
pub use transaction::Transaction;
