//! # salesdash
//!
//! A read-only query service over retail sales transactions: filtered,
//! sorted and paginated listing plus the distinct values that populate
//! filter dropdowns.
//!
//! ## Features
//!
//! - **Typed filters**: query strings are parsed into [`core::FilterParams`];
//!   malformed values are ignored rather than rejected
//! - **Pure predicate building**: [`core::build_predicate`] has no I/O, so the
//!   same predicate runs on any backend
//! - **Concurrent execution**: page fetch and total count run in parallel, as
//!   do the four facet queries
//! - **Pluggable storage**: in-memory by default, MongoDB behind the
//!   `mongodb_backend` feature
//! - **Bulk import**: CSV exports are streamed into the store in batches
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salesdash::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = InMemoryTransactionStore::new();
//!
//!     ServerBuilder::new()
//!         .with_store(store)
//!         .with_config(AppConfig::default())
//!         .serve("127.0.0.1:5000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod import;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        DashboardError, FacetAggregator, Facets, Field, FilterParams, ListParams, Page,
        PageMeta, Pagination, Predicate, QueryExecutor, SortFields, SortOrder, SortSpec,
        StorageError, Transaction, TransactionService, TransactionStore, build_predicate,
    };

    // === Storage ===
    pub use crate::storage::InMemoryTransactionStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoTransactionStore;

    // === Config ===
    pub use crate::config::{AppConfig, QueryConfig, StoreBackend};

    // === Import ===
    pub use crate::import::Importer;

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
