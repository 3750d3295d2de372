//! Liveness plus store reachability

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;
use crate::service::GoodsResult;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub version: &'static str,
}

/// 503 while the store cannot be reached, so load balancers drain us.
fn report(ping: &GoodsResult<()>) -> (StatusCode, HealthResponse) {
    let (status, status_text, store) = match ping {
        Ok(()) => (StatusCode::OK, "ok", "ok"),
        Err(e) => {
            tracing::warn!("health check: store unreachable: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        }
    };

    let body = HealthResponse {
        status: status_text,
        store,
        version: env!("CARGO_PKG_VERSION"),
    };
    (status, body)
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (status, body) = report(&state.goods.ping().await);
    (status, Json(body))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::GoodsError;
    use crate::store::StoreError;

    #[test]
    fn reachable_store_is_ok() {
        let (status, body) = report(&Ok(()));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn store_failure_is_503() {
        let err = GoodsError::Store(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        let (status, body) = report(&Err(err));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.store, "unreachable");
    }
}
