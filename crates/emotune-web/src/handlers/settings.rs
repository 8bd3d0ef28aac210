//! 설정 조회 API 핸들러.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// 현재 재확인 설정과 어댑터 정보
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// 소비 임계값 (곡)
    pub consumption_threshold: u32,
    /// 재확인 간격 (초)
    pub recheck_interval_secs: u64,
    /// 정책 평가 간격 (초)
    pub poll_interval_secs: u64,
    /// 내부 오류 후 대기 (초)
    pub error_cooldown_secs: u64,
    /// 실패 후 직전 콘텐츠 재전달
    pub replay_on_failure: bool,
    /// 시작 시 최초 감지
    pub initial_check: bool,
    /// 분류기 이름
    pub detector: String,
    /// 프레임 소스 이름
    pub frame_source: String,
    /// 카탈로그 등록 레이블
    pub labels: Vec<String>,
    /// 설정 파일 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let scheduler = &state.scheduler;
    let status = scheduler.status();
    let settings = scheduler.settings();
    let cycle = scheduler.cycle();

    Json(SettingsResponse {
        consumption_threshold: status.consumption_threshold,
        recheck_interval_secs: status.recheck_interval_secs,
        poll_interval_secs: status.poll_interval_secs,
        error_cooldown_secs: settings.error_cooldown.as_secs(),
        replay_on_failure: settings.replay_on_failure,
        initial_check: settings.initial_check,
        detector: cycle.detector_name().to_string(),
        frame_source: cycle.source_name().to_string(),
        labels: cycle.catalog().labels(),
        config_path: state
            .config_manager
            .as_ref()
            .map(|m| m.config_path().display().to_string()),
    })
}
