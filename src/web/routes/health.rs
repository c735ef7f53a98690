//! Health Routes
//!
//! - GET /health - Process status

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub authenticated: bool,
    pub uptime_seconds: u64,
    pub version: &'static str,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        authenticated: state.session.current().is_authenticated(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
