//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryTransactionStore;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoTransactionStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::core::error::StorageError;
use crate::core::store::TransactionStore;
use std::sync::Arc;

/// Open the store selected by `config`
///
/// The mongodb backend connects and ensures its indexes before returning.
/// Selecting it in a build without the `mongodb_backend` feature is an
/// [`StorageError::Unavailable`] error.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn TransactionStore>, StorageError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory transaction store");
            Ok(Arc::new(InMemoryTransactionStore::new()))
        }
        StoreBackend::Mongodb => connect_mongodb(config).await,
    }
}

#[cfg(feature = "mongodb_backend")]
async fn connect_mongodb(config: &StoreConfig) -> Result<Arc<dyn TransactionStore>, StorageError> {
    let uri = config.uri.as_deref().ok_or_else(|| StorageError::ConnectionError {
        backend: "MongoDB".to_string(),
        message: "no connection string configured".to_string(),
    })?;

    let store = MongoTransactionStore::connect(uri, &config.database, &config.collection).await?;
    store.ensure_indexes().await?;

    tracing::info!(
        database = %config.database,
        collection = %config.collection,
        "Connected to MongoDB"
    );
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn connect_mongodb(_config: &StoreConfig) -> Result<Arc<dyn TransactionStore>, StorageError> {
    Err(StorageError::Unavailable {
        backend: "mongodb".to_string(),
    })
}
