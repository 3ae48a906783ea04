//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoTransactionStore`, a `TransactionStore` backed by one
//! collection of transaction documents.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. The `id` field is mapped to MongoDB's
//! `_id` and stored as a UUID string. `meta.date` and `createdAt` are stored
//! as native BSON dates so range filters and sorting compare instants.
//!
//! # Predicate translation
//!
//! | Clause   | Filter                                                       |
//! |----------|--------------------------------------------------------------|
//! | Search   | `$or` of `{path: {$regex, $options: "i"}}` per search field   |
//! | AnyOf    | `{path: {$in: values}}` (matches any element of array fields) |
//! | Range    | `{path: {$gte: lower, $lte: upper}}`                          |

use crate::core::error::StorageError;
use crate::core::field::Field;
use crate::core::predicate::{Bound, Clause, Predicate};
use crate::core::sort::SortSpec;
use crate::core::store::TransactionStore;
use crate::core::transaction::Transaction;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Client, Collection, Database, IndexModel};

const BACKEND: &str = "MongoDB";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn date_to_bson(date: &DateTime<Utc>) -> Bson {
    Bson::DateTime(bson::DateTime::from_millis(date.timestamp_millis()))
}

/// Rewrite a BSON date as an RFC 3339 string so serde can read it back
fn date_to_string(value: &mut Bson) {
    if let Bson::DateTime(date) = value
        && let Some(parsed) = DateTime::<Utc>::from_timestamp_millis(date.timestamp_millis())
    {
        *value = Bson::String(parsed.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
}

fn bound_to_bson(bound: &Bound) -> Bson {
    match bound {
        Bound::Integer(value) => Bson::Int64(*value),
        Bound::DateTime(date) => date_to_bson(date),
    }
}

/// Convert a record into a MongoDB document
pub fn transaction_to_document(tx: &Transaction) -> Result<Document, StorageError> {
    let json = serde_json::to_value(tx).map_err(|e| StorageError::decode(BACKEND, e))?;
    let mut doc = match bson::to_bson(&json).map_err(|e| StorageError::decode(BACKEND, e))? {
        Bson::Document(d) => d,
        _ => return Err(StorageError::decode(BACKEND, "expected a document")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }
    doc.insert("createdAt", date_to_bson(&tx.created_at));
    if let Ok(meta) = doc.get_document_mut("meta") {
        meta.insert("date", date_to_bson(&tx.meta.date));
    }

    Ok(doc)
}

/// Convert a MongoDB document back into a record
pub fn document_to_transaction(mut doc: Document) -> Result<Transaction, StorageError> {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }
    if let Some(created_at) = doc.get_mut("createdAt") {
        date_to_string(created_at);
    }
    if let Ok(meta) = doc.get_document_mut("meta")
        && let Some(date) = meta.get_mut("date")
    {
        date_to_string(date);
    }

    let json = Bson::Document(doc).into_relaxed_extjson();
    serde_json::from_value(json).map_err(|e| StorageError::decode(BACKEND, e))
}

/// Translate a predicate into a MongoDB filter document
pub fn predicate_to_filter(predicate: &Predicate) -> Document {
    let mut filter = Document::new();

    for clause in predicate.clauses() {
        match clause {
            Clause::Search { needle, fields } => {
                let pattern = Clause::search_pattern(needle);
                let alternatives: Vec<Bson> = fields
                    .iter()
                    .map(|field| {
                        let path = field.path();
                        Bson::Document(doc! { path: { "$regex": pattern.as_str(), "$options": "i" } })
                    })
                    .collect();
                filter.insert("$or", alternatives);
            }
            Clause::AnyOf { field, values } => {
                filter.insert(field.path(), doc! { "$in": values.clone() });
            }
            Clause::Range {
                field,
                lower,
                upper,
            } => {
                let mut range = Document::new();
                if let Some(lower) = lower {
                    range.insert("$gte", bound_to_bson(lower));
                }
                if let Some(upper) = upper {
                    range.insert("$lte", bound_to_bson(upper));
                }
                filter.insert(field.path(), range);
            }
        }
    }

    filter
}

/// Sort document: requested field, then `_id` ascending
pub fn sort_document(sort: &SortSpec) -> Document {
    let path = sort.field.path();
    doc! { path: sort.order.direction(), "_id": 1 }
}

// ---------------------------------------------------------------------------
// MongoTransactionStore
// ---------------------------------------------------------------------------

/// Transaction store backed by a MongoDB collection
///
/// # Example
///
/// ```rust,ignore
/// use salesdash::storage::MongoTransactionStore;
///
/// let store = MongoTransactionStore::connect(
///     "mongodb://localhost:27017",
///     "salesdash",
///     "transactions",
/// ).await?;
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoTransactionStore {
    database: Database,
    collection_name: String,
}

impl MongoTransactionStore {
    /// Create a store over an existing database handle
    pub fn new(database: Database, collection_name: impl Into<String>) -> Self {
        Self {
            database,
            collection_name: collection_name.into(),
        }
    }

    /// Connect to a MongoDB deployment
    pub async fn connect(
        uri: &str,
        database: &str,
        collection_name: &str,
    ) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(client.database(database), collection_name))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(&self.collection_name)
    }

    /// Create the indexes the dashboard queries rely on
    ///
    /// - `customer.region: 1, meta.date: -1`
    /// - `product.category: 1, sales.quantity: -1`
    /// - `customer.gender: 1, meta.date: -1`
    /// - text index over `customer.name` and `customer.phone`
    ///
    /// Idempotent; called on every startup.
    pub async fn ensure_indexes(&self) -> Result<(), StorageError> {
        let region = Field::CustomerRegion.path();
        let category = Field::ProductCategory.path();
        let gender = Field::CustomerGender.path();
        let date = Field::MetaDate.path();
        let quantity = Field::SalesQuantity.path();
        let name = Field::CustomerName.path();
        let phone = Field::CustomerPhone.path();

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { region: 1, date: -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { category: 1, quantity: -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { gender: 1, date: -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { name: "text", phone: "text" })
                .build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl TransactionStore for MongoTransactionStore {
    async fn find(
        &self,
        predicate: &Predicate,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let cursor = self
            .collection()
            .find(predicate_to_filter(predicate))
            .sort(sort_document(sort))
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to find transactions: {}", e)))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to collect transactions: {}", e)))?;

        docs.into_iter().map(document_to_transaction).collect()
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, StorageError> {
        self.collection()
            .count_documents(predicate_to_filter(predicate))
            .await
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to count transactions: {}", e)))
    }

    async fn distinct(&self, field: Field) -> Result<Vec<String>, StorageError> {
        let values = self
            .collection()
            .distinct(field.path(), doc! {})
            .await
            .map_err(|e| {
                StorageError::query(BACKEND, format!("Failed to list distinct {}: {}", field, e))
            })?;

        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    async fn insert_many(&self, records: Vec<Transaction>) -> Result<u64, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }

        let docs = records
            .iter()
            .map(transaction_to_document)
            .collect::<Result<Vec<_>, _>>()?;

        let result = self
            .collection()
            .insert_many(docs)
            .await
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to insert transactions: {}", e)))?;

        Ok(result.inserted_ids.len() as u64)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.collection()
            .delete_many(doc! {})
            .await
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to clear transactions: {}", e)))?;
        Ok(())
    }
}
