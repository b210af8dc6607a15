//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    /// `ok` or `error`
    pub status: String,
    /// `sqlite`, `postgres` or `mysql`
    pub backend: String,
    pub latency_ms: Option<u64>,
}

impl ComponentHealth {
    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

fn backend_name(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Sqlite => "sqlite",
        DatabaseBackend::Postgres => "postgres",
        DatabaseBackend::MySql => "mysql",
    }
}

async fn probe_database(db: &DatabaseConnection) -> ComponentHealth {
    let backend = backend_name(db.get_database_backend()).to_string();
    let started = Instant::now();

    match db.ping().await {
        Ok(()) => ComponentHealth {
            status: "ok".to_string(),
            backend,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            ComponentHealth {
                status: "error".to_string(),
                backend,
                latency_ms: None,
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = probe_database(&state.db).await;

    let (status, http_status) = if database.is_ok() {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn reachable_database_is_ok() {
        let state = HealthState {
            db: test_connection().await,
            started_at: Arc::new(Instant::now()),
        };
        let (status, Json(body)) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.database.backend, "sqlite");
        assert!(body.database.latency_ms.is_some());
    }

    #[tokio::test]
    async fn closed_pool_is_degraded() {
        let db = test_connection().await;
        let state = HealthState {
            db: db.clone(),
            started_at: Arc::new(Instant::now()),
        };
        db.close().await.unwrap();

        let (status, Json(body)) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database.status, "error");
    }
}
