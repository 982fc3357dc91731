use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::database::{connection::DatabaseManager, models::AliasUsage};
use crate::utils::datetime::today_at;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub quota_store: QuotaStoreHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuotaStoreHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
    /// Aliases issued across all users on the current quota day
    pub aliases_issued_today: Option<i64>,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub start_time: DateTime<Utc>,
    pub utc_offset: FixedOffset,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>, utc_offset: FixedOffset) -> Self {
        let state = AppState {
            db,
            start_time: Utc::now(),
            utc_offset,
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let today = today_at(state.utc_offset);
    let issued = AliasUsage::total_for_date(&state.db.pool, today).await.ok();
    let healthy = issued.is_some();

    let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    let status = if healthy { "healthy" } else { "unhealthy" };
    let health_response = HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        quota_store: QuotaStoreHealth {
            status: status.to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
            aliases_issued_today: issued,
        },
        uptime_seconds: uptime,
    };

    if healthy {
        Ok(Json(health_response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match state.db.ping().await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    async fn create_test_health_service() -> (HealthService, Arc<DatabaseManager>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = Arc::new(
            DatabaseManager::new(&db_url)
                .await
                .expect("Failed to create test database")
        );
        db.run_migrations().await.expect("Failed to run migrations");

        let offset = FixedOffset::east_opt(0).expect("valid offset");
        (HealthService::new(db.clone(), offset), db, temp_dir)
    }

    #[tokio::test]
    async fn test_health_endpoint_reports_todays_usage() {
        let (health_service, db, _temp_dir) = create_test_health_service().await;
        let today = today_at(FixedOffset::east_opt(0).expect("valid offset"));
        AliasUsage::add(&db.pool, 42, today, 3).await.expect("seed usage");
        AliasUsage::add(&db.pool, 43, today, 2).await.expect("seed usage");
        let yesterday = today.pred_opt().unwrap_or(NaiveDate::MIN);
        AliasUsage::add(&db.pool, 42, yesterday, 9).await.expect("seed usage");

        let server = TestServer::new(health_service.router).expect("Failed to create test server");
        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let health_response: HealthResponse = response.json();
        assert_eq!(health_response.status, "healthy");
        assert_eq!(health_response.quota_store.status, "healthy");
        assert_eq!(health_response.quota_store.aliases_issued_today, Some(5));
        assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_readiness_endpoint() {
        let (health_service, _db, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let ready_response: String = response.json();
        assert_eq!(ready_response, "ready");
    }

    #[tokio::test]
    async fn test_unhealthy_when_store_closed() {
        let (health_service, db, _temp_dir) = create_test_health_service().await;
        db.pool.close().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let response = server.get("/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let (health_service, _db, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/live").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let alive_response: String = response.json();
        assert_eq!(alive_response, "alive");
    }
}
