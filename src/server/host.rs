//! Server host for transport-agnostic API exposure
//!
//! `ServerHost` holds everything an exposure needs to answer requests: the
//! configuration it was built from, the sort table and the query service
//! over the record store. It knows nothing about HTTP.

use crate::config::AppConfig;
use crate::core::service::TransactionService;
use crate::core::sort::SortFields;
use crate::core::store::TransactionStore;
use std::sync::Arc;

/// Host context containing all service state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(store, config, sort_fields);
/// let rest_app = RestExposure::build_router(Arc::new(host), vec![]);
/// ```
pub struct ServerHost {
    /// Configuration the host was built from
    pub config: Arc<AppConfig>,

    /// Sort keys accepted by the list endpoint
    pub sort_fields: Arc<SortFields>,

    /// Query service over the record store
    pub service: Arc<TransactionService>,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(
        store: Arc<dyn TransactionStore>,
        config: AppConfig,
        sort_fields: Arc<SortFields>,
    ) -> Self {
        let service = TransactionService::new(store, sort_fields.clone(), config.query);

        Self {
            config: Arc::new(config),
            sort_fields,
            service: Arc::new(service),
        }
    }

    /// Sort keys clients may pass as `sortBy`
    pub fn sort_keys(&self) -> Vec<&str> {
        self.sort_fields.keys().collect()
    }
}
