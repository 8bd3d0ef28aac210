//! API 라우트 정의.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        // 스케줄러 제어
        .route("/scheduler/start", post(handlers::scheduler::start))
        .route("/scheduler/stop", post(handlers::scheduler::stop))
        .route("/scheduler/status", get(handlers::scheduler::status))
        .route("/scheduler/configure", post(handlers::scheduler::configure))
        .route("/scheduler/reset", post(handlers::scheduler::reset))
        .route("/scheduler/consumed", post(handlers::scheduler::consumed))
        .route("/scheduler/recheck", post(handlers::scheduler::recheck))
        // 이미지 분석 (data URL 업로드)
        .route(
            "/analyze",
            post(handlers::analyze::analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // 설정
        .route("/settings", get(handlers::settings::get_settings))
        // 헬스 체크
        .route("/health", get(handlers::health::health))
}
