//! EMOTUNE 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환하거나 자체 에러에서 `#[from] CoreError`로 래핑한다.
//! 스케줄러 루프 안에서는 어떤 변형도 치명적이지 않다 — 로그 후 해당 사이클만 스킵.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 캡처 장치 사용 불가 (웹캠 미연결, 스냅샷 파일 없음)
    #[error("캡처 장치 사용 불가: {0}")]
    DeviceUnavailable(String),

    /// 프레임 읽기/디코딩 실패
    #[error("프레임 읽기 실패: {0}")]
    ReadFailed(String),

    /// 감정 분류 실패
    #[error("감정 분류 실패: {0}")]
    ClassificationFailed(String),

    /// 카탈로그에 없는 레이블 — 항상 기본 레이블로 대체되어 외부로 노출되지 않는다
    #[error("카탈로그 미등록 레이블: {0}")]
    CatalogMiss(String),

    /// 콘텐츠 전달 실패 (브라우저 실행 등)
    #[error("콘텐츠 전달 실패: {0}")]
    DispatchFailed(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 양의 정수 검증 실패 에러 생성
    pub fn not_positive(field: &str) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: "1 이상의 정수여야 합니다".to_string(),
        }
    }
}
