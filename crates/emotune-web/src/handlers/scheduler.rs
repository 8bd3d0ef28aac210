//! 스케줄러 제어 API 핸들러.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use emotune_core::models::cycle::CycleResult;
use emotune_core::models::scheduler::{ConfigureRequest, SchedulerStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{error::ApiError, AppState};

/// 실행 여부 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct RunningResponse {
    pub running: bool,
}

/// 소비 횟수 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsumptionResponse {
    pub consumption_count: u32,
}

/// 설정 변경 응답
#[derive(Debug, Serialize)]
pub struct ConfigureResponse {
    pub success: bool,
    /// 변경 후 상태
    pub status: SchedulerStatus,
}

/// POST /api/scheduler/start
pub async fn start(State(state): State<AppState>) -> Json<RunningResponse> {
    let running = state.scheduler.start();
    Json(RunningResponse { running })
}

/// POST /api/scheduler/stop
pub async fn stop(State(state): State<AppState>) -> Json<RunningResponse> {
    let running = state.scheduler.stop().await;
    Json(RunningResponse { running })
}

/// GET /api/scheduler/status
pub async fn status(State(state): State<AppState>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status())
}

/// POST /api/scheduler/configure
///
/// 0 이하 값이나 정수가 아닌 값은 400. 설정 관리자가 있으면 변경값을 파일에도 저장한다.
pub async fn configure(
    State(state): State<AppState>,
    payload: Result<Json<ConfigureRequest>, JsonRejection>,
) -> Result<Json<ConfigureResponse>, ApiError> {
    let Json(request) = payload?;
    let status = state.scheduler.configure(&request)?;

    if let Some(manager) = &state.config_manager {
        let saved = manager.update_with(|config| {
            config.recheck.recheck_interval_secs = status.recheck_interval_secs;
            config.recheck.consumption_threshold = status.consumption_threshold;
        });
        if let Err(e) = saved {
            warn!("재확인 설정 저장 실패: {e}");
        }
    }

    Ok(Json(ConfigureResponse {
        success: true,
        status,
    }))
}

/// POST /api/scheduler/reset
pub async fn reset(State(state): State<AppState>) -> Json<ConsumptionResponse> {
    Json(ConsumptionResponse {
        consumption_count: state.scheduler.reset(),
    })
}

/// POST /api/scheduler/consumed
pub async fn consumed(State(state): State<AppState>) -> Json<ConsumptionResponse> {
    Json(ConsumptionResponse {
        consumption_count: state.scheduler.notify_consumed(),
    })
}

/// POST /api/scheduler/recheck — 즉시 재확인
pub async fn recheck(State(state): State<AppState>) -> Result<Json<CycleResult>, ApiError> {
    let result = state.scheduler.run_once().await?;
    Ok(Json(result))
}
