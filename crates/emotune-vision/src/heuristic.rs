//! 밝기 기반 휴리스틱 감정 분류기.
//!
//! `EmotionClassifier` 포트 구현. ML 모델 없이 동작하는 데모용 분류기로,
//! 평균 밝기에 따라 가중치를 조정한 뒤 가중 무작위로 레이블을 고르고
//! 그럴듯한 점수 분포를 합성한다. 정확도는 목표가 아니다.

use async_trait::async_trait;
use emotune_core::error::CoreError;
use emotune_core::models::emotion::{round_score, EmotionReading, DEFAULT_LABEL, EMOTION_LABELS};
use emotune_core::models::frame::Frame;
use emotune_core::ports::classifier::EmotionClassifier;
use emotune_core::random::RandomSource;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::stats;

/// 분류기 이름
pub const HEURISTIC_DETECTOR: &str = "heuristic";

/// 이 밝기보다 밝으면 `happy` 가중치 상향
const BRIGHT_THRESHOLD: f64 = 120.0;
/// 이 밝기보다 어두우면 `sad` 가중치 상향
const DARK_THRESHOLD: f64 = 100.0;

/// 밝기 기반 휴리스틱 분류기
pub struct HeuristicClassifier {
    rng: Arc<dyn RandomSource>,
}

impl HeuristicClassifier {
    /// 새 분류기 생성
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }

    /// 밝기별 레이블 가중치 (정규화 전). 누적 선택 순서를 유지하기 위해 배열로 반환.
    fn weights(brightness: f64) -> [(&'static str, f64); 7] {
        [
            ("happy", if brightness > BRIGHT_THRESHOLD { 0.3 } else { 0.1 }),
            ("neutral", 0.4),
            ("sad", if brightness < DARK_THRESHOLD { 0.2 } else { 0.1 }),
            ("angry", 0.1),
            ("fear", 0.05),
            ("surprise", 0.1),
            ("disgust", 0.05),
        ]
    }

    /// 누적 가중치로 지배 레이블 선택
    fn pick_label(&self, brightness: f64) -> &'static str {
        let weights = Self::weights(brightness);
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let roll = self.rng.next_f64();

        let mut cumulative = 0.0;
        for (label, weight) in weights {
            cumulative += weight / total;
            if roll <= cumulative {
                return label;
            }
        }
        DEFAULT_LABEL
    }

    /// 지배 레이블 중심의 합성 점수 (합계 100, 소수점 2자리)
    fn synth_scores(&self, dominant: &str) -> BTreeMap<String, f64> {
        let base = self.rng.uniform(0.6, 0.9);
        let raw: Vec<(&str, f64)> = EMOTION_LABELS
            .iter()
            .map(|&label| {
                let value = if label == dominant {
                    base
                } else {
                    self.rng.uniform(0.01, 0.15)
                };
                (label, value * 100.0)
            })
            .collect();

        let total: f64 = raw.iter().map(|(_, v)| v).sum();
        raw.into_iter()
            .map(|(label, v)| (label.to_string(), round_score(v / total * 100.0)))
            .collect()
    }

    /// 이미 계산된 밝기로 분류 (디코딩 없이)
    pub fn classify_brightness(&self, brightness: f64) -> EmotionReading {
        let label = self.pick_label(brightness);
        let scores = self.synth_scores(label);
        let reading = EmotionReading::new(label, scores, HEURISTIC_DETECTOR);
        info!(
            "휴리스틱 분류: {} ({:.1}%, 밝기 {:.1})",
            reading.label, reading.confidence, brightness
        );
        reading
    }
}

#[async_trait]
impl EmotionClassifier for HeuristicClassifier {
    async fn classify(&self, frame: &Frame) -> Result<EmotionReading, CoreError> {
        let frame = frame.clone();
        let brightness = tokio::task::spawn_blocking(move || {
            let image = stats::decode(&frame)?;
            stats::mean_brightness(&image)
        })
        .await
        .map_err(|e| CoreError::Internal(format!("작업 조인 실패: {e}")))?
        .map_err(|e| CoreError::ClassificationFailed(e.to_string()))?;

        Ok(self.classify_brightness(brightness))
    }

    fn detector_name(&self) -> &str {
        HEURISTIC_DETECTOR
    }
}
