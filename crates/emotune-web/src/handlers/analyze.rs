//! 이미지 분석 API 핸들러.
//!
//! 브라우저가 캡처한 웹캠 프레임(data URL)을 분류하고 콘텐츠를 골라준다.
//! 재생은 클라이언트가 하므로 서버는 소비 1회만 기록한다.

use axum::{extract::State, Json};
use emotune_core::models::cycle::CycleResult;
use emotune_core::models::frame::Frame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, AppState};

/// 분석 요청
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// `data:image/...;base64,` 형식 이미지
    pub image: String,
}

/// 분석 응답
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: CycleResult,
    /// 기록 후 소비 횟수
    pub consumption_count: u32,
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if request.image.trim().is_empty() {
        return Err(ApiError::BadRequest("이미지가 없습니다".to_string()));
    }

    let frame = Frame::from_data_url(&request.image)?;
    debug!("분석 요청: {} bytes ({:?})", frame.data.len(), frame.format);

    let result = state.scheduler.analyze_frame(&frame).await;
    let consumption_count = state.scheduler.status().consumption_count;

    Ok(Json(AnalyzeResponse {
        result,
        consumption_count,
    }))
}
