//! # astra-api -- HTTP Service for AstraMark
//!
//! Axum service around the AstraMark domain: business analysis through a
//! rotating set of language models, generated marketing content, live or
//! offline market data, a background market scanner, and SHA-256 proofs
//! of every analysis.
//!
//! ## API Surface
//!
//! | Prefix               | Module                   | Domain                |
//! |----------------------|--------------------------|-----------------------|
//! | `/api/`, `/api/health`, `/api/metrics` | [`routes::meta`] | Service metadata |
//! | `/api/auth/*`        | [`routes::users`]        | Accounts and tokens   |
//! | `/api/plans`         | [`routes::plans`]        | Plan catalogue        |
//! | `/api/analyze`, `/api/analyses/*`, `/api/businesses` | [`routes::analysis`] | Analysis pipeline |
//! | `/api/generate/*`    | [`routes::content`]      | Generated content     |
//! | `/api/export/pdf/*`  | [`routes::export`]       | PDF reports           |
//! | `/api/market/*`      | [`routes::market`]       | Market intelligence   |
//! | `/api/proofs/*`      | [`routes::proofs`]       | Proof verification    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CORS → Metrics → Auth → RateLimit → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated with utoipa derive macros, served at `/openapi.json`.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::{Extension, Router};

use crate::middleware::metrics::ApiMetrics;
use crate::middleware::rate_limit::RateLimiter;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health checks (`/health/*`) are mounted outside the middleware stack
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let limiter = RateLimiter::new(state.config.rate_limit.clone());
    let cors = middleware::cors::layer(&state.config.cors_origins);

    let api = Router::new()
        .merge(routes::meta::router())
        .merge(routes::users::router())
        .merge(routes::plans::router())
        .merge(routes::analysis::router())
        .merge(routes::content::router())
        .merge(routes::export::router())
        .merge(routes::market::router())
        .merge(routes::proofs::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(cors)
        .layer(middleware::tracing_layer::layer())
        .layer(Extension(metrics))
        .layer(Extension(limiter))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness check: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: 200 once the router is serving.
async fn readiness() -> &'static str {
    "ready"
}
