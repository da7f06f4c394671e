use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use inventario_api::{config::AppConfig, db, handlers::AppServices, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // Minimal configuration suitable for tests. A single connection keeps
        // the in-memory database alive for the lifetime of the pool.
        let mut cfg = AppConfig::new("sqlite::memory:", "127.0.0.1", 0, "test");
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect test database");
        db::run_migrations(&pool).await.expect("run migrations");
        let db = Arc::new(pool);

        let services = AppServices::new(db.clone());
        let state = Arc::new(AppState {
            db,
            config: cfg,
            services,
        });
        let router = inventario_api::app_router(state.clone());

        Self { router, state }
    }

    /// Issue a request against the in-process router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("route request")
    }
}
