//! 샘플 사이클 결과 모델.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::content::ContentRef;

/// 사이클이 실패한 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    /// 프레임 획득
    Capture,
    /// 감정 분류
    Classification,
    /// 사이클 실행 중 예기치 못한 내부 오류 (패닉 등)
    Internal,
}

/// 캡처 → 분류 → 선택 1회 시도의 결과.
///
/// 스케줄러는 `success == true`일 때만 상태를 갱신한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// 감지된 레이블. 분류 실패 시에는 최후 수단 무작위 레이블, 캡처 실패 시 `None`
    pub label: Option<String>,
    /// 분류 성공 여부
    pub success: bool,
    /// 선택된 콘텐츠 (성공 시에만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentRef>,
    /// 레이블별 점수
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
    /// 사용된 분류기 이름
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,
    /// 실패 단계
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<CycleStage>,
    /// 진단 메시지
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CycleResult {
    /// 실패 결과 생성
    pub fn failure(stage: CycleStage, message: impl Into<String>) -> Self {
        Self {
            label: None,
            success: false,
            content: None,
            scores: BTreeMap::new(),
            detector: None,
            failed_stage: Some(stage),
            message: Some(message.into()),
        }
    }
}
