//! 스케줄러 상태 조회/설정 DTO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::content::ContentRef;

/// 스케줄러 상태 스냅샷 — 한 번의 락 획득으로 복사되므로 부분 갱신이 관찰되지 않는다
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    /// 루프 실행 중 여부
    pub running: bool,
    /// 마지막으로 성공한 감지 레이블
    pub current_label: Option<String>,
    /// 마지막 재확인 이후 소비 횟수
    pub consumption_count: u32,
    /// 마지막 재확인 성공 시각
    pub last_check_time: Option<DateTime<Utc>>,
    /// 소비 횟수 트리거 값
    pub consumption_threshold: u32,
    /// 경과 시간 트리거 값 (초)
    pub recheck_interval_secs: u64,
    /// 루프 폴링 간격 (초)
    pub poll_interval_secs: u64,
    /// 시도한 사이클 수
    pub cycles_attempted: u64,
    /// 실패한 사이클 수
    pub cycles_failed: u64,
    /// 마지막으로 전달된 콘텐츠
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_content: Option<ContentRef>,
}

/// 재확인 트리거 설정 변경 요청 — 생략된 필드는 유지
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureRequest {
    /// 경과 시간 트리거 (초)
    #[serde(default)]
    pub recheck_interval_secs: Option<u64>,
    /// 소비 횟수 트리거
    #[serde(default)]
    pub consumption_threshold: Option<u32>,
}

impl ConfigureRequest {
    /// 양의 정수 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.recheck_interval_secs == Some(0) {
            return Err(CoreError::not_positive("recheck_interval_secs"));
        }
        if self.consumption_threshold == Some(0) {
            return Err(CoreError::not_positive("consumption_threshold"));
        }
        Ok(())
    }
}
