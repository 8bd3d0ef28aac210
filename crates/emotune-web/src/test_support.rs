//! 핸들러 테스트용 스케줄러 구성.

use async_trait::async_trait;
use emotune_core::config::{CatalogConfig, RecheckConfig};
use emotune_core::error::CoreError;
use emotune_core::models::emotion::EmotionReading;
use emotune_core::models::frame::{Frame, FrameFormat};
use emotune_core::ports::classifier::EmotionClassifier;
use emotune_core::ports::frame_source::FrameSource;
use emotune_core::random::SequenceRandom;
use emotune_engine::catalog::StaticCatalog;
use emotune_engine::dispatcher::LogDispatcher;
use emotune_engine::{SampleCycle, Scheduler, SchedulerSettings};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::AppState;

struct StaticSource;

#[async_trait]
impl FrameSource for StaticSource {
    async fn capture(&self) -> Result<Frame, CoreError> {
        Ok(Frame::new(b"frame".to_vec(), FrameFormat::Jpeg))
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

struct FixedClassifier(String);

#[async_trait]
impl EmotionClassifier for FixedClassifier {
    async fn classify(&self, _frame: &Frame) -> Result<EmotionReading, CoreError> {
        let mut scores = BTreeMap::new();
        scores.insert(self.0.clone(), 88.0);
        Ok(EmotionReading::new(self.0.clone(), scores, "fixed"))
    }

    fn detector_name(&self) -> &str {
        "fixed"
    }
}

/// 고정 레이블을 내는 스케줄러 (정지 상태)
pub fn scheduler(label: &str) -> Arc<Scheduler> {
    let rng = Arc::new(SequenceRandom::new(vec![0.0]));
    let catalog = Arc::new(StaticCatalog::new(&CatalogConfig::default(), rng.clone()).unwrap());
    let cycle = SampleCycle::new(
        Arc::new(StaticSource),
        Arc::new(FixedClassifier(label.to_string())),
        catalog,
        rng,
    );
    let settings = SchedulerSettings {
        poll_interval: Duration::from_millis(20),
        stop_timeout: Duration::from_secs(2),
        ..SchedulerSettings::from(&RecheckConfig::default())
    };
    Arc::new(Scheduler::new(cycle, Arc::new(LogDispatcher), settings))
}

pub fn state(label: &str) -> AppState {
    AppState::new(scheduler(label))
}
