//! Shared test harness for store backends and the HTTP layer
//!
//! Provides a deterministic fixture set of sales transactions, helpers to
//! parse query strings the way the REST layer does, and the
//! `transaction_store_tests!` conformance suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod store_tests;

use axum::extract::Query;
use axum::http::Uri;
use chrono::{DateTime, Duration, TimeZone, Utc};
use salesdash::config::QueryConfig;
use salesdash::core::transaction::{Customer, Meta, Product, Sales};
use salesdash::prelude::*;
use std::sync::Arc;

pub const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
pub const CATEGORIES: [&str; 3] = ["Clothing", "Electronics", "Beauty"];
pub const PAYMENT_METHODS: [&str; 3] = ["UPI", "Cash", "Credit Card"];

/// Number of records in [`fixture_records`]
pub const FIXTURE_LEN: usize = 33;

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

/// A record with the given name and date, everything else neutral
pub fn record(name: &str, date: DateTime<Utc>) -> Transaction {
    Transaction::new(
        Customer {
            id: format!("CUST-{}", name.len()),
            name: name.to_string(),
            phone: "9000000000".to_string(),
            gender: "Female".to_string(),
            age: 30,
            region: "North".to_string(),
            customer_type: "New".to_string(),
        },
        Product {
            id: "PROD-1".to_string(),
            name: "Cotton Tee".to_string(),
            brand: "Loom".to_string(),
            category: "Clothing".to_string(),
            tags: Vec::new(),
        },
        Sales {
            quantity: 1,
            price_per_unit: 100.0,
            discount: 0.0,
            total_amount: 100.0,
            final_amount: 100.0,
        },
        Meta {
            date,
            payment_method: "UPI".to_string(),
            status: "Completed".to_string(),
            delivery_type: "Standard".to_string(),
            store_id: "ST-1".to_string(),
            employee_name: "Ravi".to_string(),
        },
    )
}

/// Midnight UTC on 2024-01-01
pub fn jan_first() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// The standard fixture set
///
/// - 30 generated records, one per day from 2024-01-01 10:00 UTC
/// - "Late January" at 2024-01-31 23:30 UTC
/// - "Early February" at 2024-02-01 00:00 UTC
/// - "New Year's Eve" at 2023-12-31 23:59 UTC
///
/// Regions, categories and payment methods cycle through the constants
/// above; ages run 18, 20, .. 76; quantities cycle 1..=7.
pub fn fixture_records() -> Vec<Transaction> {
    let mut records: Vec<Transaction> = (0..30)
        .map(|i| {
            let name = match i {
                0 => "Asha Rao".to_string(),
                1 => "Rahul Verma".to_string(),
                2 => "Priya (VIP)".to_string(),
                3 => "Neha+Sharma".to_string(),
                _ => format!("Customer {:02}", i),
            };
            let date = jan_first() + Duration::days(i as i64) + Duration::hours(10);

            let mut tx = record(&name, date);
            tx.customer.phone = format!("98{:08}", i);
            tx.customer.gender = if i % 2 == 0 { "Female" } else { "Male" }.to_string();
            tx.customer.age = 18 + 2 * i as i64;
            tx.customer.region = REGIONS[i % REGIONS.len()].to_string();
            tx.product.category = CATEGORIES[i % CATEGORIES.len()].to_string();
            tx.product.tags = match i % 5 {
                0 => vec!["sale".to_string(), "organic".to_string()],
                1 => vec!["new".to_string()],
                2 => Vec::new(),
                _ => vec!["sale".to_string()],
            };
            tx.sales.quantity = (i % 7) as i64 + 1;
            tx.meta.payment_method = PAYMENT_METHODS[i % PAYMENT_METHODS.len()].to_string();
            tx
        })
        .collect();

    records.push(record(
        "Late January",
        Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap(),
    ));
    records.push(record(
        "Early February",
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    ));
    records.push(record(
        "New Year's Eve",
        Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 0).unwrap(),
    ));

    records
}

/// `count` records on distinct days, named "Record 00", "Record 01", ..
pub fn numbered_records(count: usize) -> Vec<Transaction> {
    (0..count)
        .map(|i| record(&format!("Record {:02}", i), jan_first() + Duration::days(i as i64)))
        .collect()
}

// ---------------------------------------------------------------------------
// Service helpers
// ---------------------------------------------------------------------------

/// Parse a query string exactly as the list endpoint does
pub fn params(query: &str) -> ListParams {
    let uri: Uri = format!("/api/transactions?{}", query)
        .parse()
        .expect("test query should form a valid URI");
    let pairs = Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .expect("test query should decode")
        .0;
    ListParams::from_pairs(pairs)
}

/// A service with default sort table and query settings over `store`
pub fn service_for(store: Arc<dyn TransactionStore>) -> TransactionService {
    TransactionService::new(store, Arc::new(SortFields::default()), QueryConfig::default())
}

/// Customer names of a page, in order
pub fn names(page: &Page<Transaction>) -> Vec<String> {
    page.data.iter().map(|t| t.customer.name.clone()).collect()
}
