//! Bulk CSV import
//!
//! Reads the sales export one row at a time, maps each row into a
//! [`Transaction`] and writes them to the store in batches. Rows are never
//! all held in memory; at most one batch is.
//!
//! Column mapping is by header name. Missing columns read as empty. Numeric
//! columns that do not parse become 0, the `Tags` column is split on commas,
//! and a `Date` that does not parse fails the import with the offending line.

use crate::config::ImportConfig;
use crate::core::error::{DashboardError, ImportError};
use crate::core::store::TransactionStore;
use crate::core::transaction::{Customer, Meta, Product, Sales, Transaction};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// One row of the sales export, as it appears in the file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourceRow {
    #[serde(rename = "Customer ID")]
    customer_id: String,
    #[serde(rename = "Customer Name")]
    customer_name: String,
    #[serde(rename = "Phone Number")]
    phone: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Customer Region")]
    region: String,
    #[serde(rename = "Customer Type")]
    customer_type: String,

    #[serde(rename = "Product ID")]
    product_id: String,
    #[serde(rename = "Product Name")]
    product_name: String,
    #[serde(rename = "Brand")]
    brand: String,
    #[serde(rename = "Product Category")]
    category: String,
    #[serde(rename = "Tags")]
    tags: String,

    #[serde(rename = "Quantity")]
    quantity: String,
    #[serde(rename = "Price per Unit")]
    price_per_unit: String,
    #[serde(rename = "Discount Percentage")]
    discount: String,
    #[serde(rename = "Total Amount")]
    total_amount: String,
    #[serde(rename = "Final Amount")]
    final_amount: String,

    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Payment Method")]
    payment_method: String,
    #[serde(rename = "Order Status")]
    status: String,
    #[serde(rename = "Delivery Type")]
    delivery_type: String,
    #[serde(rename = "Store ID")]
    store_id: String,
    #[serde(rename = "Employee Name")]
    employee_name: String,
}

impl SourceRow {
    fn into_transaction(self) -> Result<Transaction, String> {
        let date = parse_date(&self.date)
            .ok_or_else(|| format!("unparseable date '{}'", self.date))?;

        Ok(Transaction::new(
            Customer {
                id: self.customer_id,
                name: self.customer_name,
                phone: self.phone,
                gender: self.gender,
                age: integer_or_zero(&self.age),
                region: self.region,
                customer_type: self.customer_type,
            },
            Product {
                id: self.product_id,
                name: self.product_name,
                brand: self.brand,
                category: self.category,
                tags: split_tags(&self.tags),
            },
            Sales {
                quantity: integer_or_zero(&self.quantity),
                price_per_unit: number_or_zero(&self.price_per_unit),
                discount: number_or_zero(&self.discount),
                total_amount: number_or_zero(&self.total_amount),
                final_amount: number_or_zero(&self.final_amount),
            },
            Meta {
                date,
                payment_method: self.payment_method,
                status: self.status,
                delivery_type: self.delivery_type,
                store_id: self.store_id,
                employee_name: self.employee_name,
            },
        ))
    }
}

fn number_or_zero(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn integer_or_zero(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| n as i64)
        })
        .unwrap_or(0)
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Streams CSV rows into a [`TransactionStore`]
///
/// # Example
///
/// ```rust,ignore
/// let importer = Importer::new(store.clone(), config.import);
/// let total = importer.import_path(Path::new("sales.csv")).await?;
/// ```
pub struct Importer {
    store: Arc<dyn TransactionStore>,
    config: ImportConfig,
}

impl Importer {
    pub fn new(store: Arc<dyn TransactionStore>, config: ImportConfig) -> Self {
        Self { store, config }
    }

    /// Import a CSV file, returning the number of records written
    pub async fn import_path(&self, path: &Path) -> Result<u64, DashboardError> {
        let source_name = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| ImportError::ReadError {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        self.import_reader(file, &source_name).await
    }

    /// Import CSV data from any reader
    ///
    /// The first row must be the header row.
    pub async fn import_reader<R: Read>(
        &self,
        reader: R,
        source_name: &str,
    ) -> Result<u64, DashboardError> {
        let read_error = |e: csv::Error| ImportError::ReadError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers().map_err(read_error)?.clone();

        if self.config.clear_existing {
            self.store.clear().await?;
            tracing::info!("Old data cleared");
        }

        let batch_size = self.config.batch_size.max(1);
        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0u64;
        let mut record = csv::StringRecord::new();

        while reader.read_record(&mut record).map_err(read_error)? {
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let row: SourceRow =
                record
                    .deserialize(Some(&headers))
                    .map_err(|e| ImportError::InvalidRow {
                        line,
                        message: e.to_string(),
                    })?;
            let tx = row
                .into_transaction()
                .map_err(|message| ImportError::InvalidRow { line, message })?;

            batch.push(tx);
            if batch.len() >= batch_size {
                total += self.flush(&mut batch).await?;
            }
        }

        if !batch.is_empty() {
            total += self.flush(&mut batch).await?;
        }

        tracing::info!(source = source_name, total, "Data import completed");
        Ok(total)
    }

    async fn flush(&self, batch: &mut Vec<Transaction>) -> Result<u64, DashboardError> {
        let written = self.store.insert_many(std::mem::take(batch)).await?;
        tracing::info!("Processed {} records...", written);
        Ok(written)
    }
}
