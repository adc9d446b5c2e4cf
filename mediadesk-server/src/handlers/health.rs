use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    debug!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "Mediadesk is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "dev_mode": state.config().dev_mode,
        "checks": {}
    });

    let backend = if state.postgres.is_some() { "postgres" } else { "memory" };
    let mut is_unhealthy = false;

    match state.works.count().await {
        Ok(total) => {
            health_status["checks"]["database"] = json!({
                "status": "healthy",
                "backend": backend,
                "total_works": total
            });
        }
        Err(e) => {
            warn!(error = %e, "health check failed");
            health_status["checks"]["database"] = json!({
                "status": "unhealthy",
                "backend": backend,
                "error": e.to_string()
            });
            is_unhealthy = true;
        }
    }

    if let Some(pg) = &state.postgres {
        let stats = pg.pool_stats();
        let ping = match pg.ping().await {
            Ok(()) => json!("healthy"),
            Err(e) => {
                warn!(error = %e, "database ping failed");
                is_unhealthy = true;
                json!("unhealthy")
            }
        };
        health_status["checks"]["pool"] = json!({
            "status": ping,
            "size": stats.size,
            "idle": stats.idle,
            "max_size": stats.max_size
        });
    }

    if is_unhealthy {
        health_status["status"] = json!("unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
    } else {
        (StatusCode::OK, Json(health_status))
    }
}
