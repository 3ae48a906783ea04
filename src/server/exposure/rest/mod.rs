//! REST API exposure for the dashboard
//!
//! This module provides REST-specific routing and handlers.
//! It is isolated from the query core: the core never sees axum types
//! beyond the query-string extractor used in tests.
//!
//! The REST exposure consumes a `ServerHost` and produces an Axum `Router`.

pub mod handlers;

use super::super::host::ServerHost;
use axum::http::{Method, header};
use axum::{Json, Router, routing::get};
use handlers::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - `GET /api/transactions` and `GET /api/transactions/options`
    /// - `GET /` banner and health check routes
    /// - Custom routes, merged last
    ///
    /// CORS and request tracing wrap every route.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let state = AppState {
            service: host.service.clone(),
        };

        let api_routes = Router::new()
            .route("/api/transactions", get(handlers::list_transactions))
            .route("/api/transactions/options", get(handlers::filter_options))
            .with_state(state);

        let mut app = Self::health_routes().merge(api_routes);

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(Self::cors_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Any origin; the dashboard front end is served from elsewhere
    fn cors_layer() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "salesdash"
        }))
    }
}
