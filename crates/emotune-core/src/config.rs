//! 애플리케이션 설정 구조체.
//!
//! 재확인 트리거, 프레임 캡처, 분류기, 콘텐츠 카탈로그, 웹 제어 서버 설정을 정의한다.
//! [`crate::config_manager::ConfigManager`]를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::emotion::DEFAULT_LABEL;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 재확인 스케줄러 설정
    #[serde(default)]
    pub recheck: RecheckConfig,
    /// 프레임 캡처 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 감정 분류기 설정
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// 콘텐츠 카탈로그 설정
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// 웹 제어 서버 설정
    #[serde(default)]
    pub web: WebConfig,
}

// ============================================================
// 재확인 설정
// ============================================================

/// 재확인 스케줄러 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecheckConfig {
    /// 재확인까지 소비 횟수 (곡 수)
    #[serde(default = "default_consumption_threshold")]
    pub consumption_threshold: u32,
    /// 재확인 경과 시간 (초)
    #[serde(default = "default_recheck_interval_secs")]
    pub recheck_interval_secs: u64,
    /// 루프 폴링 간격 (초)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// 내부 오류 후 대기 배수 (폴링 간격 × 배수)
    #[serde(default = "default_error_cooldown_multiplier")]
    pub error_cooldown_multiplier: u32,
    /// 중지 시 루프 종료 대기 한도 (초)
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: u64,
    /// 사이클 실패 시 직전 레이블 콘텐츠 재전달
    #[serde(default = "default_true")]
    pub replay_on_failure: bool,
    /// 시작 직후 레이블이 없으면 첫 루프에서 감지 수행
    #[serde(default = "default_true")]
    pub initial_check: bool,
}

impl Default for RecheckConfig {
    fn default() -> Self {
        Self {
            consumption_threshold: default_consumption_threshold(),
            recheck_interval_secs: default_recheck_interval_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            error_cooldown_multiplier: default_error_cooldown_multiplier(),
            stop_timeout_secs: default_stop_timeout_secs(),
            replay_on_failure: true,
            initial_check: true,
        }
    }
}

impl RecheckConfig {
    /// 폴링 간격
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// 내부 오류 후 대기 시간
    pub fn error_cooldown(&self) -> Duration {
        self.poll_interval()
            .saturating_mul(self.error_cooldown_multiplier.max(1))
    }

    /// 중지 대기 한도
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    /// 트리거 값 검증 (모두 1 이상)
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.consumption_threshold == 0 {
            return Err(CoreError::not_positive("consumption_threshold"));
        }
        if self.recheck_interval_secs == 0 {
            return Err(CoreError::not_positive("recheck_interval_secs"));
        }
        if self.poll_interval_secs == 0 {
            return Err(CoreError::not_positive("poll_interval_secs"));
        }
        Ok(())
    }
}

fn default_consumption_threshold() -> u32 {
    3
}

fn default_recheck_interval_secs() -> u64 {
    300 // 5분
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_error_cooldown_multiplier() -> u32 {
    10
}

fn default_stop_timeout_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

// ============================================================
// 캡처 설정
// ============================================================

/// 프레임 캡처 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 외부 웹캠 에이전트가 기록하는 스냅샷 파일 경로
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// 허용 최대 프레임 크기 (바이트)
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("saved_img.jpg")
}

fn default_max_frame_bytes() -> usize {
    10 * 1024 * 1024
}

// ============================================================
// 분류기 설정
// ============================================================

/// 분류기 백엔드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// 밝기 기반 휴리스틱 (ML 의존성 없음)
    #[default]
    Heuristic,
    /// 원격 모델 추론 서버
    Remote,
}

/// 감정 분류기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// 사용할 백엔드
    #[serde(default)]
    pub backend: ClassifierBackend,
    /// 원격 추론 엔드포인트 URL
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,
    /// 원격 요청 타임아웃 (초)
    #[serde(default = "default_classifier_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Heuristic,
            endpoint: default_classifier_endpoint(),
            timeout_secs: default_classifier_timeout_secs(),
        }
    }
}

fn default_classifier_endpoint() -> String {
    "http://127.0.0.1:5005/analyze".to_string()
}

fn default_classifier_timeout_secs() -> u64 {
    30
}

// ============================================================
// 카탈로그 설정
// ============================================================

/// 콘텐츠 카탈로그 설정 — 레이블 → URI 목록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 미등록 레이블 대체 레이블
    #[serde(default = "default_catalog_label")]
    pub default_label: String,
    /// 레이블별 콘텐츠 URI
    #[serde(default = "default_catalog_entries")]
    pub entries: BTreeMap<String, Vec<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_label: default_catalog_label(),
            entries: default_catalog_entries(),
        }
    }
}

impl CatalogConfig {
    /// 기본 레이블에 최소 1개 항목이 있어야 조회가 실패하지 않는다
    pub fn validate(&self) -> Result<(), CoreError> {
        match self.entries.get(&self.default_label) {
            Some(uris) if !uris.is_empty() => Ok(()),
            _ => Err(CoreError::Config(format!(
                "기본 레이블 '{}'에 콘텐츠가 없음",
                self.default_label
            ))),
        }
    }
}

fn default_catalog_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_catalog_entries() -> BTreeMap<String, Vec<String>> {
    const PLAYLIST: &str = "https://open.spotify.com/playlist/";
    let table: [(&str, &[&str]); 5] = [
        (
            "happy",
            &[
                "4nd7oGDNgfM0rv28CQw9WQ",
                "37i9dQZF1DWTwbZHrJRIgD",
                "1tTXdi6Bp04Pgmam9bSN7W",
                "0jrlHA5UmxRxJjoykf7qRY",
            ],
        ),
        (
            "sad",
            &[
                "0VPrITrZqpMpIRGAs33Tmz",
                "4YOfhHpjPB0tq29NPpDY3F",
                "1eRXF5lCwXzXArmtULo4Ji",
                "5qYMFV8EdILwgFbCwyG85Y",
            ],
        ),
        (
            "angry",
            &[
                "7pS8tMgJgzQ8XSGpOajOqb",
                "5rPNCmrHpkrfQvbyfFfEib",
                "0a4Hr64HWlxekayZ8wnWqx",
                "0YMghmr5hSy2rrkL4BVuHP",
            ],
        ),
        (
            "neutral",
            &[
                "7EClwmhqu7mg4JvUI9z5DT",
                "4PFwZ4h1LMAOwdwXqvSYHd",
                "3M1mbdfDqoDRbA46C3PRJi",
                "4ftcK3C6QUeMUOMAQpOkDf",
            ],
        ),
        ("fear", &["4pUX3ojKN2OxXP7I4Lu9ij", "5AM4lgcUAw5sokybXj3ny7"]),
    ];

    table
        .iter()
        .map(|(label, ids)| {
            let uris = ids.iter().map(|id| format!("{PLAYLIST}{id}")).collect();
            (label.to_string(), uris)
        })
        .collect()
}

// ============================================================
// 웹 설정
// ============================================================

/// 웹 제어 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 포트
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 (0.0.0.0 바인드)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_web_port(),
            allow_external: false,
        }
    }
}

fn default_web_port() -> u16 {
    8080
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 전체 설정 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        self.recheck.validate()?;
        self.catalog.validate()?;
        if self.classifier.backend == ClassifierBackend::Remote
            && self.classifier.endpoint.trim().is_empty()
        {
            return Err(CoreError::Config(
                "원격 분류기 엔드포인트가 비어 있음".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier.backend, ClassifierBackend::Heuristic);
    }

    #[test]
    fn error_cooldown_is_ten_polls() {
        let config = RecheckConfig::default();
        assert_eq!(config.error_cooldown(), Duration::from_secs(100));
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut config = AppConfig::default_config();
        config.recheck.consumption_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn catalog_without_default_label_rejected() {
        let mut config = AppConfig::default_config();
        config.catalog.entries.remove("neutral");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("neutral"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"recheck": {"consumption_threshold": 5}}"#).unwrap();
        assert_eq!(config.recheck.consumption_threshold, 5);
        assert_eq!(config.recheck.recheck_interval_secs, 300);
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.catalog.entries.len(), 5);
    }

    #[test]
    fn default_catalog_has_playlist_urls() {
        let entries = default_catalog_entries();
        assert_eq!(entries["fear"].len(), 2);
        assert!(entries["happy"][0].starts_with("https://open.spotify.com/playlist/"));
    }
}
