//! HTTP handlers for the dashboard endpoints
//!
//! Success bodies carry `"success": true` next to the payload. Failures are
//! rendered by [`ApiError`] as `{"success": false, "message": ...}` with a
//! 500 status and a fixed message per route.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::error::ApiError;
use crate::core::facets::Facets;
use crate::core::query::{ListParams, PageMeta};
use crate::core::service::TransactionService;
use crate::core::transaction::Transaction;

pub const LIST_FAILED: &str = "Server Error processing transactions";
pub const OPTIONS_FAILED: &str = "Could not load filter options";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransactionService>,
}

/// Response for the list endpoint
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    pub success: bool,
    pub data: Vec<Transaction>,
    pub meta: PageMeta,
}

/// Response for the filter options endpoint
#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub facets: Facets,
}

/// List transactions matching the query string
///
/// `GET /api/transactions?search=&region=&gender=&category=&paymentMethod=&tags=
/// &minAge=&maxAge=&startDate=&endDate=&sortBy=&order=&page=&limit=`
pub async fn list_transactions(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // A query string that does not decode at all constrains nothing
    let params = match pairs {
        Ok(Query(pairs)) => ListParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "ignoring undecodable query string");
            ListParams::default()
        }
    };

    let page = state
        .service
        .list(&params)
        .await
        .map_err(|e| e.with_public_message(LIST_FAILED))?;

    Ok(Json(ListTransactionsResponse {
        success: true,
        data: page.data,
        meta: page.meta,
    }))
}

/// Distinct values for the filter dropdowns
///
/// `GET /api/transactions/options`
pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let facets = state
        .service
        .facets()
        .await
        .map_err(|e| e.with_public_message(OPTIONS_FAILED))?;

    Ok(Json(FilterOptionsResponse {
        success: true,
        facets,
    }))
}

/// Plain-text banner at `/`
pub async fn root() -> &'static str {
    "Sales dashboard API is running..."
}
