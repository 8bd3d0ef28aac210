//! 헬스 체크 API 핸들러.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// 헬스 체크 응답
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub detector: String,
    pub scheduler_running: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        detector: state.scheduler.cycle().detector_name().to_string(),
        scheduler_running: state.scheduler.is_running(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health(State(test_support::state("happy"))).await.0;
        assert_eq!(response.status, "ok");
        assert_eq!(response.detector, "fixed");
        assert!(!response.scheduler_running);
    }
}
