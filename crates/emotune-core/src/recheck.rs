//! 재확인 정책.
//!
//! 소비 횟수 트리거와 경과 시간 트리거를 OR로 결합한다.
//! 두 조건이 동시에 충족되어도 재확인은 1회다. I/O 없는 순수 함수.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 정책 판단에 필요한 상태 값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecheckInput {
    /// 마지막 재확인 이후 소비 횟수
    pub consumption_count: u32,
    /// 소비 횟수 트리거 값
    pub consumption_threshold: u32,
    /// 마지막 재확인 성공 시각
    pub last_check_time: Option<DateTime<Utc>>,
    /// 경과 시간 트리거 값 (초)
    pub recheck_interval_secs: u64,
}

/// 재확인이 필요한 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecheckReason {
    /// 소비 횟수 도달
    Consumption,
    /// 경과 시간 도달
    Interval,
}

/// 재확인 필요 여부와 이유.
///
/// 둘 다 충족되면 `Consumption`을 보고한다 (로그용 구분일 뿐 동작 차이 없음).
/// `last_check_time`이 없으면 시간 조건은 평가하지 않는다 — 시작 직후 오발동 방지.
pub fn evaluate(input: &RecheckInput, now: DateTime<Utc>) -> Option<RecheckReason> {
    if input.consumption_count >= input.consumption_threshold {
        return Some(RecheckReason::Consumption);
    }

    let last = input.last_check_time?;
    let elapsed_ms = (now - last).num_milliseconds();
    let interval_ms =
        i64::try_from(input.recheck_interval_secs.saturating_mul(1_000)).unwrap_or(i64::MAX);
    if elapsed_ms >= interval_ms {
        return Some(RecheckReason::Interval);
    }

    None
}

/// 재확인 필요 여부
pub fn is_due(input: &RecheckInput, now: DateTime<Utc>) -> bool {
    evaluate(input, now).is_some()
}
