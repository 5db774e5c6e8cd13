//! # Subscription Plans API

use axum::routing::get;
use axum::{Json, Router};

use astra_core::plans::{catalogue, Plan};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/plans", get(list_plans))
}

/// GET /api/plans: Available subscription plans.
#[utoipa::path(
    get,
    path = "/api/plans",
    responses(
        (status = 200, description = "Plans, cheapest first", body = Vec<Plan>),
    ),
    tag = "plans"
)]
async fn list_plans() -> Json<Vec<Plan>> {
    Json(catalogue())
}
