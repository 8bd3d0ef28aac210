//! 어댑터 생성 (DI 와이어링).
//!
//! 설정만 보고 포트 구현체를 고른다. 스케줄러와 사이클은 구체 타입을 모른다.

use emotune_core::config::{AppConfig, ClassifierBackend, ClassifierConfig};
use emotune_core::error::CoreError;
use emotune_core::ports::classifier::EmotionClassifier;
use emotune_core::ports::dispatcher::ContentDispatcher;
use emotune_core::random::{RandomSource, ThreadRandom};
use emotune_engine::catalog::StaticCatalog;
use emotune_engine::dispatcher::{BrowserDispatcher, LogDispatcher};
use emotune_engine::{SampleCycle, Scheduler, SchedulerSettings};
use emotune_network::RemoteEmotionClassifier;
use emotune_vision::heuristic::HeuristicClassifier;
use emotune_vision::snapshot::SnapshotFrameSource;
use std::sync::Arc;
use tracing::info;

/// 설정된 백엔드의 분류기 생성
pub fn build_classifier(
    config: &ClassifierConfig,
    rng: Arc<dyn RandomSource>,
) -> Result<Arc<dyn EmotionClassifier>, CoreError> {
    let classifier: Arc<dyn EmotionClassifier> = match config.backend {
        ClassifierBackend::Heuristic => Arc::new(HeuristicClassifier::new(rng)),
        ClassifierBackend::Remote => Arc::new(RemoteEmotionClassifier::new(config)?),
    };
    info!("감정 분류기: {}", classifier.detector_name());
    Ok(classifier)
}

/// 콘텐츠 전달자 생성
pub fn build_dispatcher(headless: bool) -> Arc<dyn ContentDispatcher> {
    if headless {
        info!("헤드리스 모드: 콘텐츠는 로그로만 출력");
        Arc::new(LogDispatcher)
    } else {
        Arc::new(BrowserDispatcher::new())
    }
}

/// 스케줄러 조립
pub fn build_scheduler(
    config: &AppConfig,
    dispatcher: Arc<dyn ContentDispatcher>,
    rng: Arc<dyn RandomSource>,
) -> Result<Arc<Scheduler>, CoreError> {
    config.validate()?;

    let frame_source = Arc::new(SnapshotFrameSource::new(
        &config.capture.snapshot_path,
        config.capture.max_frame_bytes,
    ));
    let classifier = build_classifier(&config.classifier, rng.clone())?;
    let catalog = Arc::new(StaticCatalog::new(&config.catalog, rng.clone())?);

    info!(
        "스냅샷 경로: {} / 카탈로그 레이블: {}",
        frame_source.path().display(),
        config.catalog.entries.len()
    );

    let cycle = SampleCycle::new(frame_source, classifier, catalog, rng);
    let settings = SchedulerSettings::from(&config.recheck);
    Ok(Arc::new(Scheduler::new(cycle, dispatcher, settings)))
}

/// 기본 난수 소스
pub fn default_rng() -> Arc<dyn RandomSource> {
    Arc::new(ThreadRandom)
}
