//! 샘플 사이클 — 캡처 → 분류 → 콘텐츠 선택.
//!
//! 사이클 자체는 스케줄러 상태를 건드리지 않는다. 결과([`CycleResult`])만 반환하고
//! 상태 반영과 전달은 [`crate::scheduler::Scheduler`]가 맡는다.
//!
//! 분류가 실패하면 최후 수단 레이블을 무작위로 골라 `success = false`로 보고한다.
//! 콘텐츠는 선택하지 않으며 이 결과는 스케줄러 상태를 갱신하지 않는다.

use emotune_core::error::CoreError;
use emotune_core::models::cycle::{CycleResult, CycleStage};
use emotune_core::models::emotion::{EmotionReading, DEFAULT_LABEL, LAST_RESORT_LABELS};
use emotune_core::models::frame::Frame;
use emotune_core::ports::catalog::ContentCatalog;
use emotune_core::ports::classifier::EmotionClassifier;
use emotune_core::ports::frame_source::FrameSource;
use emotune_core::random::RandomSource;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 최후 수단 결과의 detector 이름
pub const FALLBACK_DETECTOR: &str = "fallback-random";

/// 1회 샘플링 파이프라인
#[derive(Clone)]
pub struct SampleCycle {
    frame_source: Arc<dyn FrameSource>,
    classifier: Arc<dyn EmotionClassifier>,
    catalog: Arc<dyn ContentCatalog>,
    rng: Arc<dyn RandomSource>,
}

impl SampleCycle {
    /// 새 사이클 생성
    pub fn new(
        frame_source: Arc<dyn FrameSource>,
        classifier: Arc<dyn EmotionClassifier>,
        catalog: Arc<dyn ContentCatalog>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            frame_source,
            classifier,
            catalog,
            rng,
        }
    }

    /// 콘텐츠 카탈로그
    pub fn catalog(&self) -> &Arc<dyn ContentCatalog> {
        &self.catalog
    }

    /// 분류기 이름
    pub fn detector_name(&self) -> &str {
        self.classifier.detector_name()
    }

    /// 프레임 소스 이름
    pub fn source_name(&self) -> &str {
        self.frame_source.source_name()
    }

    /// 캡처부터 선택까지 1회 실행
    pub async fn run(&self) -> CycleResult {
        let frame = match self.frame_source.capture().await {
            Ok(frame) => frame,
            Err(e) => {
                warn!("프레임 캡처 실패 ({}): {e}", self.frame_source.source_name());
                return CycleResult::failure(CycleStage::Capture, e.to_string());
            }
        };

        debug!("프레임 캡처: {} bytes", frame.data.len());
        self.classify_frame(&frame).await
    }

    /// 이미 확보한 프레임을 분류하고 콘텐츠 선택
    pub async fn classify_frame(&self, frame: &Frame) -> CycleResult {
        match self.classifier.classify(frame).await {
            Ok(reading) => self.select(reading),
            Err(e) => self.last_resort(e),
        }
    }

    fn select(&self, reading: EmotionReading) -> CycleResult {
        let content = self.catalog.select_for(&reading.label);
        info!(
            "감지 감정: {} ({:.1}%) → {}",
            reading.label, reading.confidence, content.uri
        );

        CycleResult {
            label: Some(reading.label),
            success: true,
            content: Some(content),
            scores: reading.scores,
            detector: Some(reading.detector),
            failed_stage: None,
            message: None,
        }
    }

    /// 분류 실패 시 무작위 최후 수단 레이블
    fn last_resort(&self, error: CoreError) -> CycleResult {
        let label = LAST_RESORT_LABELS[self.rng.pick_index(LAST_RESORT_LABELS.len())];
        warn!("감정 분류 실패, 대체 레이블 사용: {label} ({error})");

        let mut scores = BTreeMap::new();
        scores.insert(DEFAULT_LABEL.to_string(), 15.0);
        scores.insert(label.to_string(), 85.0);

        CycleResult {
            label: Some(label.to_string()),
            success: false,
            content: None,
            scores,
            detector: Some(FALLBACK_DETECTOR.to_string()),
            failed_stage: Some(CycleStage::Classification),
            message: Some(error.to_string()),
        }
    }
}
