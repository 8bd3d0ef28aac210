//! 감정 분류 결과 모델.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 분류기가 반환할 수 있는 전체 레이블 집합
pub const EMOTION_LABELS: [&str; 7] = [
    "happy", "sad", "angry", "neutral", "fear", "surprise", "disgust",
];

/// 카탈로그 조회 실패 시 대체되는 기본 레이블
pub const DEFAULT_LABEL: &str = "neutral";

/// 분류 자체가 실패했을 때 무작위로 고르는 최후 수단 레이블
pub const LAST_RESORT_LABELS: [&str; 3] = ["happy", "neutral", "sad"];

/// 감정 분류 결과 — 모델 기반/휴리스틱 분류기 공통 형태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    /// 지배적 감정 레이블 (소문자)
    pub label: String,
    /// 레이블별 점수 (백분율, 소수점 2자리)
    pub scores: BTreeMap<String, f64>,
    /// 분류기 이름 (예: "heuristic", "remote-model")
    pub detector: String,
    /// 지배적 레이블의 점수
    pub confidence: f64,
}

impl EmotionReading {
    /// 점수 분포에서 신뢰도를 계산해 결과 생성
    pub fn new(label: impl Into<String>, scores: BTreeMap<String, f64>, detector: &str) -> Self {
        let label = label.into().to_lowercase();
        let confidence = scores.get(&label).copied().unwrap_or(0.0);
        Self {
            label,
            scores,
            detector: detector.to_string(),
            confidence,
        }
    }
}

/// 백분율 점수를 소수점 2자리로 반올림
pub fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
