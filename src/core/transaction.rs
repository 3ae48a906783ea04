//! The sales transaction record
//!
//! A `Transaction` is the only entity the dashboard reads. Records are written
//! once by the bulk importer and never mutated through the query API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One sales transaction, grouped the way it is stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Store identifier, assigned at import
    pub id: Uuid,

    pub customer: Customer,

    pub product: Product,

    pub sales: Sales,

    pub meta: Meta,

    /// When the record was imported
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub age: i64,
    pub region: String,
    #[serde(rename = "type")]
    pub customer_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    /// Set-like: order carries no meaning for membership tests
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sales {
    pub quantity: i64,
    pub price_per_unit: f64,
    pub discount: f64,
    pub total_amount: f64,
    pub final_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub delivery_type: String,
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub employee_name: String,
}

impl Transaction {
    /// Create a record with a fresh id, stamped with the current time
    pub fn new(customer: Customer, product: Product, sales: Sales, meta: Meta) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer,
            product,
            sales,
            meta,
            created_at: Utc::now(),
        }
    }
}
