use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::{
    config::Config,
    db::{self, DbPool},
    error::AppError,
    response::ApiResponse,
};

/// # GET /api/health
pub async fn health(State(pool): State<DbPool>, State(config): State<Arc<Config>>) -> impl IntoResponse {
    let database = if db::ping(&pool).await {
        "ok"
    } else {
        "unavailable"
    };

    ApiResponse::ok(json!({
        "timestamp": Utc::now().to_rfc3339(),
        "environment": config.environment,
        "database": database,
    }))
    .with_message("Server is running")
}

/// # GET /
pub async fn root() -> impl IntoResponse {
    ApiResponse::ok(json!({ "version": env!("CARGO_PKG_VERSION") }))
        .with_message("Purchase Order API")
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}
