//! Inventario API Library
//!
//! This crate provides the core functionality for the Inventario API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn item_service(&self) -> Arc<services::items::ItemService> {
        self.services.items.clone()
    }
}

/// Build the application router: status/health plus the item CRUD API.
///
/// Middleware (request tracing, CORS) is layered on top by the binary so the
/// router can be exercised directly in tests.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/items", handlers::items::item_routes())
        .fallback(fallback_not_found)
        .with_state(state)
}

async fn root() -> &'static str {
    "inventario-api up"
}

async fn fallback_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Resource not found" })),
    )
}
