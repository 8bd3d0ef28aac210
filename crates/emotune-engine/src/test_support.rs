//! 엔진 단위 테스트용 포트 더블.

use async_trait::async_trait;
use emotune_core::config::CatalogConfig;
use emotune_core::error::CoreError;
use emotune_core::models::content::ContentRef;
use emotune_core::models::emotion::EmotionReading;
use emotune_core::models::frame::{Frame, FrameFormat};
use emotune_core::ports::catalog::ContentCatalog;
use emotune_core::ports::classifier::EmotionClassifier;
use emotune_core::ports::dispatcher::ContentDispatcher;
use emotune_core::ports::frame_source::FrameSource;
use emotune_core::random::SequenceRandom;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::StaticCatalog;

pub fn catalog() -> Arc<dyn ContentCatalog> {
    Arc::new(
        StaticCatalog::new(
            &CatalogConfig::default(),
            Arc::new(SequenceRandom::new(vec![0.0])),
        )
        .unwrap(),
    )
}

pub struct StaticSource;

#[async_trait]
impl FrameSource for StaticSource {
    async fn capture(&self) -> Result<Frame, CoreError> {
        Ok(Frame::new(b"frame".to_vec(), FrameFormat::Jpeg))
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

pub struct FailingSource;

#[async_trait]
impl FrameSource for FailingSource {
    async fn capture(&self) -> Result<Frame, CoreError> {
        Err(CoreError::DeviceUnavailable("카메라 없음".to_string()))
    }

    fn source_name(&self) -> &str {
        "failing"
    }
}

/// 고정 레이블을 반환하고 호출 횟수를 센다
pub struct FixedClassifier {
    label: Mutex<String>,
    pub calls: AtomicUsize,
}

impl FixedClassifier {
    pub fn new(label: &str) -> Self {
        Self {
            label: Mutex::new(label.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_label(&self, label: &str) {
        *self.label.lock() = label.to_string();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmotionClassifier for FixedClassifier {
    async fn classify(&self, _frame: &Frame) -> Result<EmotionReading, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let label = self.label.lock().clone();
        let mut scores = BTreeMap::new();
        scores.insert(label.clone(), 90.0);
        Ok(EmotionReading::new(label, scores, "fixed"))
    }

    fn detector_name(&self) -> &str {
        "fixed"
    }
}

/// 분류마다 `delay`만큼 걸린다
pub struct SlowClassifier {
    label: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowClassifier {
    pub fn new(label: &str, delay: Duration) -> Self {
        Self {
            label: label.to_string(),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmotionClassifier for SlowClassifier {
    async fn classify(&self, _frame: &Frame) -> Result<EmotionReading, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let mut scores = BTreeMap::new();
        scores.insert(self.label.clone(), 80.0);
        Ok(EmotionReading::new(self.label.clone(), scores, "slow"))
    }

    fn detector_name(&self) -> &str {
        "slow"
    }
}

#[derive(Default)]
pub struct FailingClassifier;

#[async_trait]
impl EmotionClassifier for FailingClassifier {
    async fn classify(&self, _frame: &Frame) -> Result<EmotionReading, CoreError> {
        Err(CoreError::ClassificationFailed("얼굴 없음".to_string()))
    }

    fn detector_name(&self) -> &str {
        "failing"
    }
}

/// 호출 시 패닉 — 사이클 내부 오류 경로 검증용
pub struct PanickingClassifier {
    pub calls: AtomicUsize,
}

#[async_trait]
impl EmotionClassifier for PanickingClassifier {
    async fn classify(&self, _frame: &Frame) -> Result<EmotionReading, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("classifier exploded");
    }

    fn detector_name(&self) -> &str {
        "panicking"
    }
}

/// 전달된 콘텐츠 기록
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<ContentRef>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<ContentRef> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ContentDispatcher for RecordingDispatcher {
    async fn dispatch(&self, content: &ContentRef) -> Result<(), CoreError> {
        self.sent.lock().push(content.clone());
        Ok(())
    }
}
