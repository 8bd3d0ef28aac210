//! 감정 재확인 스케줄러.
//!
//! 백그라운드 tokio 태스크 하나가 `poll_interval`마다 재확인 정책을 평가하고,
//! 필요하면 [`SampleCycle`]을 실행한다. 상태는 `parking_lot::Mutex`로 보호되며
//! 락은 `.await`를 넘어서 유지되지 않는다.
//!
//! - 성공 사이클: 레이블, `last_check_time`, 소비 횟수를 한 번의 락으로 갱신 후 콘텐츠 전달
//! - 실패 사이클: 상태 유지. 설정에 따라 현재 레이블의 콘텐츠를 다시 전달
//! - 사이클 태스크 패닉: 내부 오류로 기록하고 `error_cooldown`만큼 대기
//!
//! 루프는 세대(generation) 번호로 식별된다. `start()`가 세대를 올리므로
//! 이전 세대의 루프는 다음 깨어날 때 스스로 종료한다.

use chrono::{DateTime, Utc};
use emotune_core::config::RecheckConfig;
use emotune_core::error::CoreError;
use emotune_core::models::content::ContentRef;
use emotune_core::models::cycle::CycleResult;
use emotune_core::models::frame::Frame;
use emotune_core::models::scheduler::{ConfigureRequest, SchedulerStatus};
use emotune_core::ports::dispatcher::ContentDispatcher;
use emotune_core::recheck::{self, RecheckInput, RecheckReason};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cycle::SampleCycle;

/// 스케줄러 실행 설정
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// 초기 소비 임계값
    pub consumption_threshold: u32,
    /// 초기 재확인 간격 (초)
    pub recheck_interval_secs: u64,
    /// 정책 평가 간격
    pub poll_interval: Duration,
    /// 내부 오류 후 대기 시간
    pub error_cooldown: Duration,
    /// `stop()`의 루프 종료 대기 한도
    pub stop_timeout: Duration,
    /// 실패 사이클 후 현재 레이블 콘텐츠 재전달 여부
    pub replay_on_failure: bool,
    /// 레이블이 없을 때 첫 루프에서 즉시 감지
    pub initial_check: bool,
}

impl From<&RecheckConfig> for SchedulerSettings {
    fn from(config: &RecheckConfig) -> Self {
        Self {
            consumption_threshold: config.consumption_threshold,
            recheck_interval_secs: config.recheck_interval_secs,
            poll_interval: config.poll_interval(),
            error_cooldown: config.error_cooldown(),
            stop_timeout: config.stop_timeout(),
            replay_on_failure: config.replay_on_failure,
            initial_check: config.initial_check,
        }
    }
}

/// 공유 가변 상태
#[derive(Debug)]
struct SchedulerState {
    current_label: Option<String>,
    consumption_count: u32,
    consumption_threshold: u32,
    last_check_time: Option<DateTime<Utc>>,
    recheck_interval_secs: u64,
    running: bool,
    generation: u64,
    cycles_attempted: u64,
    cycles_failed: u64,
    last_content: Option<ContentRef>,
}

impl SchedulerState {
    fn new(settings: &SchedulerSettings) -> Self {
        Self {
            current_label: None,
            consumption_count: 0,
            consumption_threshold: settings.consumption_threshold,
            last_check_time: None,
            recheck_interval_secs: settings.recheck_interval_secs,
            running: false,
            generation: 0,
            cycles_attempted: 0,
            cycles_failed: 0,
            last_content: None,
        }
    }

    fn recheck_input(&self) -> RecheckInput {
        RecheckInput {
            consumption_count: self.consumption_count,
            consumption_threshold: self.consumption_threshold,
            last_check_time: self.last_check_time,
            recheck_interval_secs: self.recheck_interval_secs,
        }
    }
}

/// 재확인 실행 계기
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// 시작 직후 최초 감지
    Initial,
    /// 정책 충족
    Policy(RecheckReason),
}

/// 사이클 결과 반영 후 할 일
enum Followup {
    Deliver(ContentRef),
    Replay(String),
    Nothing,
}

/// 루프 태스크와 핸들러가 함께 보는 부분
struct Shared {
    state: Mutex<SchedulerState>,
    cycle: SampleCycle,
    dispatcher: Arc<dyn ContentDispatcher>,
    settings: SchedulerSettings,
    /// 실행 여부 신호 — 대기 중인 루프를 즉시 깨운다
    running_tx: watch::Sender<bool>,
    /// 루프 사이클과 수동 재확인이 겹치지 않도록 직렬화
    cycle_gate: tokio::sync::Mutex<()>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        let state = self.state.lock();
        state.running && state.generation == generation
    }

    /// 지금 실행할 재확인 계기.
    ///
    /// 최초 감지(`Trigger::Initial`)는 정책이 충족되지 않아도 실행된다. 레이블이 아직
    /// 없으면 시작 직후 한 번 감지하기 위해서다.
    fn due_trigger(&self, now: DateTime<Utc>) -> Option<Trigger> {
        let state = self.state.lock();
        if let Some(reason) = recheck::evaluate(&state.recheck_input(), now) {
            return Some(Trigger::Policy(reason));
        }

        let pending_initial = self.settings.initial_check
            && state.current_label.is_none()
            && state.last_check_time.is_none();
        pending_initial.then_some(Trigger::Initial)
    }

    /// 수동 재확인. 계기와 무관하게 사이클을 실행한다.
    async fn execute(&self) -> Result<CycleResult, CoreError> {
        let _gate = self.cycle_gate.lock().await;
        self.run_cycle().await
    }

    /// 루프용 실행. 게이트를 잡은 뒤 세대와 계기를 다시 평가한다.
    ///
    /// 게이트를 기다리는 동안 다른 사이클이 재확인을 끝냈으면 `None`.
    async fn execute_if_due(&self, generation: u64) -> Option<Result<CycleResult, CoreError>> {
        let _gate = self.cycle_gate.lock().await;
        if !self.is_current(generation) {
            return None;
        }

        let Some(trigger) = self.due_trigger(Utc::now()) else {
            debug!("대기 중 재확인 완료됨, 사이클 생략");
            return None;
        };
        info!(?trigger, "감정 재확인 실행");
        Some(self.run_cycle().await)
    }

    /// 사이클 1회 실행 + 상태 반영 + 전달. 게이트를 잡은 상태에서 호출.
    ///
    /// 사이클은 별도 태스크에서 돌린다. 패닉은 `CoreError::Internal`로 돌아온다.
    async fn run_cycle(&self) -> Result<CycleResult, CoreError> {
        let cycle = self.cycle.clone();
        let result = match tokio::spawn(async move { cycle.run().await }).await {
            Ok(result) => result,
            Err(e) => {
                let mut state = self.state.lock();
                state.cycles_attempted += 1;
                state.cycles_failed += 1;
                return Err(CoreError::Internal(format!("사이클 태스크 비정상 종료: {e}")));
            }
        };

        let followup = self.apply(&result);
        self.follow_up(followup).await;
        Ok(result)
    }

    /// 결과를 상태에 반영. 성공 시 세 필드를 한 번의 락으로 갱신.
    fn apply(&self, result: &CycleResult) -> Followup {
        let mut state = self.state.lock();
        state.cycles_attempted += 1;

        match (&result.label, result.success) {
            (Some(label), true) => {
                let now = Utc::now();
                state.current_label = Some(label.clone());
                let checked = state.last_check_time.map_or(now, |prev| prev.max(now));
                state.last_check_time = Some(checked);
                state.consumption_count = 0;
                state.last_content = result.content.clone();
                info!("현재 감정 갱신: {label}");

                result
                    .content
                    .clone()
                    .map_or(Followup::Nothing, Followup::Deliver)
            }
            _ => {
                state.cycles_failed += 1;
                warn!(
                    stage = ?result.failed_stage,
                    "재확인 실패, 상태 유지: {}",
                    result.message.as_deref().unwrap_or("-")
                );

                match (&state.current_label, self.settings.replay_on_failure) {
                    (Some(label), true) => Followup::Replay(label.clone()),
                    _ => Followup::Nothing,
                }
            }
        }
    }

    async fn follow_up(&self, followup: Followup) {
        let content = match followup {
            Followup::Deliver(content) => content,
            Followup::Replay(label) => {
                let content = self.cycle.catalog().select_for(&label);
                debug!("직전 감정 콘텐츠 재전달: {label}");
                self.state.lock().last_content = Some(content.clone());
                content
            }
            Followup::Nothing => return,
        };

        if let Err(e) = self.dispatcher.dispatch(&content).await {
            warn!("콘텐츠 전달 실패: {e}");
        }
    }
}

/// 백그라운드 재확인 루프
async fn run_loop(shared: Arc<Shared>, generation: u64) {
    let mut running_rx = shared.running_tx.subscribe();
    info!(
        generation,
        poll_secs = shared.settings.poll_interval.as_secs_f64(),
        "재확인 루프 시작"
    );

    loop {
        if !shared.is_current(generation) {
            break;
        }

        let outcome = match shared.due_trigger(Utc::now()) {
            Some(_) => shared.execute_if_due(generation).await,
            None => None,
        };
        let wait = match outcome {
            Some(Err(e)) => {
                error!(
                    "재확인 루프 내부 오류: {e} ({:?} 대기)",
                    shared.settings.error_cooldown
                );
                shared.settings.error_cooldown
            }
            _ => shared.settings.poll_interval,
        };

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            changed = running_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!(generation, "재확인 루프 종료");
}

/// 감정 재확인 스케줄러
pub struct Scheduler {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// 새 스케줄러 생성 (정지 상태)
    pub fn new(
        cycle: SampleCycle,
        dispatcher: Arc<dyn ContentDispatcher>,
        settings: SchedulerSettings,
    ) -> Self {
        let (running_tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState::new(&settings)),
                cycle,
                dispatcher,
                settings,
                running_tx,
                cycle_gate: tokio::sync::Mutex::new(()),
            }),
            task: Mutex::new(None),
        }
    }

    /// 실행 설정
    pub fn settings(&self) -> &SchedulerSettings {
        &self.shared.settings
    }

    /// 샘플 사이클
    pub fn cycle(&self) -> &SampleCycle {
        &self.shared.cycle
    }

    /// 루프 시작. 이미 실행 중이면 아무것도 하지 않는다. tokio 런타임 안에서 호출해야 한다.
    pub fn start(&self) -> bool {
        let generation = {
            let mut state = self.shared.state.lock();
            if state.running {
                debug!("스케줄러 이미 실행 중");
                return true;
            }
            state.running = true;
            state.generation += 1;
            state.generation
        };

        self.shared.running_tx.send_replace(true);
        let handle = tokio::spawn(run_loop(self.shared.clone(), generation));

        // 이전 핸들이 남아 있으면 분리 — 세대 불일치로 스스로 종료한다
        if self.task.lock().replace(handle).is_some() {
            debug!("이전 루프 핸들 분리");
        }
        info!(generation, "스케줄러 시작");
        true
    }

    /// 루프 정지. 진행 중인 사이클은 끝까지 실행되며 `stop_timeout`까지만 기다린다.
    pub async fn stop(&self) -> bool {
        let was_running = {
            let mut state = self.shared.state.lock();
            std::mem::replace(&mut state.running, false)
        };
        self.shared.running_tx.send_replace(false);

        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(self.shared.settings.stop_timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("재확인 루프 비정상 종료: {e}"),
                Err(_) => warn!(
                    "재확인 루프 종료 대기 시간 초과 ({:?}), 진행 중 사이클 후 종료",
                    self.shared.settings.stop_timeout
                ),
            }
        }

        if was_running {
            info!("스케줄러 정지");
        }
        false
    }

    /// 실행 여부
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    /// 일관된 상태 스냅샷
    pub fn status(&self) -> SchedulerStatus {
        let state = self.shared.state.lock();
        SchedulerStatus {
            running: state.running,
            current_label: state.current_label.clone(),
            consumption_count: state.consumption_count,
            last_check_time: state.last_check_time,
            consumption_threshold: state.consumption_threshold,
            recheck_interval_secs: state.recheck_interval_secs,
            poll_interval_secs: self.shared.settings.poll_interval.as_secs(),
            cycles_attempted: state.cycles_attempted,
            cycles_failed: state.cycles_failed,
            last_content: state.last_content.clone(),
        }
    }

    /// 콘텐츠 1개 소비 기록. 증가 후 횟수 반환.
    pub fn notify_consumed(&self) -> u32 {
        let mut state = self.shared.state.lock();
        state.consumption_count = state.consumption_count.saturating_add(1);
        debug!(
            "소비 기록: {}/{}",
            state.consumption_count, state.consumption_threshold
        );
        state.consumption_count
    }

    /// 소비 횟수만 초기화
    pub fn reset(&self) -> u32 {
        self.shared.state.lock().consumption_count = 0;
        info!("소비 횟수 초기화");
        0
    }

    /// 트리거 값 변경. 0은 거부되며 이 경우 아무 값도 바뀌지 않는다.
    pub fn configure(&self, request: &ConfigureRequest) -> Result<SchedulerStatus, CoreError> {
        request.validate()?;
        {
            let mut state = self.shared.state.lock();
            if let Some(interval) = request.recheck_interval_secs {
                state.recheck_interval_secs = interval;
            }
            if let Some(threshold) = request.consumption_threshold {
                state.consumption_threshold = threshold;
            }
            info!(
                "재확인 설정 변경: 간격 {}초, 임계값 {}곡",
                state.recheck_interval_secs, state.consumption_threshold
            );
        }
        Ok(self.status())
    }

    /// 사이클 즉시 1회 실행. 실행 여부와 무관하며 루프와 같은 반영 규칙을 따른다.
    pub async fn run_once(&self) -> Result<CycleResult, CoreError> {
        self.shared.execute().await
    }

    /// 업로드된 프레임 분석. 현재 레이블은 바꾸지 않고, 분석이 성공해 콘텐츠가
    /// 선택되면 소비 1회로 기록.
    pub async fn analyze_frame(&self, frame: &Frame) -> CycleResult {
        let result = self.shared.cycle.classify_frame(frame).await;
        if result.success && result.content.is_some() {
            self.notify_consumed();
        }
        result
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shared.state.lock().running = false;
        self.shared.running_tx.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        catalog, FailingClassifier, FailingSource, FixedClassifier, PanickingClassifier,
        RecordingDispatcher, SlowClassifier, StaticSource,
    };
    use emotune_core::models::cycle::CycleStage;
    use emotune_core::models::frame::FrameFormat;
    use emotune_core::ports::classifier::EmotionClassifier;
    use emotune_core::ports::frame_source::FrameSource;
    use emotune_core::random::SequenceRandom;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn settings(poll_ms: u64) -> SchedulerSettings {
        SchedulerSettings {
            poll_interval: Duration::from_millis(poll_ms),
            error_cooldown: Duration::from_millis(poll_ms * 10),
            stop_timeout: Duration::from_secs(2),
            ..SchedulerSettings::from(&RecheckConfig::default())
        }
    }

    fn scheduler_with(
        source: Arc<dyn FrameSource>,
        classifier: Arc<dyn EmotionClassifier>,
        dispatcher: Arc<RecordingDispatcher>,
        settings: SchedulerSettings,
    ) -> Scheduler {
        let cycle = SampleCycle::new(
            source,
            classifier,
            catalog(),
            Arc::new(SequenceRandom::new(vec![0.0])),
        );
        Scheduler::new(cycle, dispatcher, settings)
    }

    fn fixed(label: &str) -> (Scheduler, Arc<FixedClassifier>, Arc<RecordingDispatcher>) {
        let classifier = Arc::new(FixedClassifier::new(label));
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            classifier.clone(),
            dispatcher.clone(),
            settings(20),
        );
        (scheduler, classifier, dispatcher)
    }

    #[test]
    fn new_scheduler_is_idle() {
        let (scheduler, _, _) = fixed("happy");
        let status = scheduler.status();
        assert!(!status.running);
        assert!(status.current_label.is_none());
        assert!(status.last_check_time.is_none());
        assert_eq!(status.consumption_count, 0);
        assert_eq!(status.consumption_threshold, 3);
        assert_eq!(status.recheck_interval_secs, 300);
    }

    #[tokio::test]
    async fn successful_run_updates_state_atomically() {
        let (scheduler, _, dispatcher) = fixed("sad");
        scheduler.notify_consumed();
        scheduler.notify_consumed();

        let before = Utc::now();
        let result = scheduler.run_once().await.unwrap();
        let after = Utc::now();

        assert!(result.success);
        let status = scheduler.status();
        assert_eq!(status.current_label.as_deref(), Some("sad"));
        assert_eq!(status.consumption_count, 0);
        let checked = status.last_check_time.unwrap();
        assert!(checked >= before && checked <= after);
        assert_eq!(status.last_content, result.content);

        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].label, "sad");
    }

    #[tokio::test]
    async fn failed_cycle_leaves_state_unchanged() {
        let (scheduler, _, dispatcher) = fixed("happy");
        scheduler.run_once().await.unwrap();
        scheduler.notify_consumed();
        let before = scheduler.status();

        let failure = CycleResult::failure(CycleStage::Capture, "카메라 없음");
        let followup = scheduler.shared.apply(&failure);
        scheduler.shared.follow_up(followup).await;

        let after = scheduler.status();
        assert_eq!(after.current_label, before.current_label);
        assert_eq!(after.last_check_time, before.last_check_time);
        assert_eq!(after.consumption_count, before.consumption_count);
        assert_eq!(after.cycles_failed, 1);

        // 직전 레이블 콘텐츠 재전달
        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].label, "happy");
    }

    #[tokio::test]
    async fn capture_failure_without_label_dispatches_nothing() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let scheduler = scheduler_with(
            Arc::new(FailingSource),
            Arc::new(FixedClassifier::new("happy")),
            dispatcher.clone(),
            settings(20),
        );

        let result = scheduler.run_once().await.unwrap();
        assert!(!result.success);
        assert!(scheduler.status().current_label.is_none());
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn replay_can_be_disabled() {
        let classifier = Arc::new(FixedClassifier::new("angry"));
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            classifier,
            dispatcher.clone(),
            SchedulerSettings {
                replay_on_failure: false,
                ..settings(20)
            },
        );
        scheduler.run_once().await.unwrap();

        let followup = scheduler
            .shared
            .apply(&CycleResult::failure(CycleStage::Capture, "x"));
        scheduler.shared.follow_up(followup).await;
        assert_eq!(dispatcher.sent().len(), 1);
    }

    #[tokio::test]
    async fn always_failing_classifier_never_changes_label() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            Arc::new(FailingClassifier),
            dispatcher,
            settings(20),
        );

        for _ in 0..5 {
            let result = scheduler.run_once().await.unwrap();
            assert!(!result.success);
            assert_eq!(result.failed_stage, Some(CycleStage::Classification));
        }

        let status = scheduler.status();
        assert!(status.current_label.is_none());
        assert!(status.last_check_time.is_none());
        assert_eq!(status.cycles_attempted, 5);
        assert_eq!(status.cycles_failed, 5);
    }

    #[tokio::test]
    async fn panicking_cycle_is_internal_error() {
        let classifier = Arc::new(PanickingClassifier {
            calls: AtomicUsize::new(0),
        });
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            classifier.clone(),
            Arc::new(RecordingDispatcher::default()),
            settings(20),
        );

        let err = scheduler.run_once().await.unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
        assert_eq!(scheduler.status().cycles_failed, 1);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn start_is_idempotent_and_stop_resumes() {
        let (scheduler, _, _) = fixed("happy");

        assert!(scheduler.start());
        assert!(scheduler.start());
        assert_eq!(scheduler.shared.state.lock().generation, 1);
        assert!(scheduler.is_running());

        assert!(!scheduler.stop().await);
        assert!(!scheduler.is_running());

        assert!(scheduler.start());
        assert!(scheduler.is_running());
        assert_eq!(scheduler.shared.state.lock().generation, 2);

        scheduler.stop().await;
        assert!(!scheduler.status().running);
    }

    #[tokio::test]
    async fn stop_without_start_is_noop() {
        let (scheduler, _, _) = fixed("happy");
        assert!(!scheduler.stop().await);
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn loop_performs_initial_check() {
        let (scheduler, classifier, dispatcher) = fixed("fear");
        scheduler.start();
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop().await;

        // 최초 감지 1회 후에는 정책이 충족되지 않아 추가 사이클 없음
        assert_eq!(classifier.calls(), 1);
        assert_eq!(scheduler.status().current_label.as_deref(), Some("fear"));
        assert_eq!(dispatcher.sent().len(), 1);
    }

    #[tokio::test]
    async fn loop_rechecks_after_threshold_consumption() {
        let (scheduler, classifier, _) = fixed("happy");
        scheduler.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.status().current_label.as_deref(), Some("happy"));

        classifier.set_label("sad");
        for _ in 0..3 {
            scheduler.notify_consumed();
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop().await;

        let status = scheduler.status();
        assert_eq!(status.current_label.as_deref(), Some("sad"));
        assert_eq!(status.consumption_count, 0);
        assert_eq!(classifier.calls(), 2);
    }

    #[tokio::test]
    async fn loop_without_initial_check_waits_for_policy() {
        let classifier = Arc::new(FixedClassifier::new("happy"));
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            classifier.clone(),
            Arc::new(RecordingDispatcher::default()),
            SchedulerSettings {
                initial_check: false,
                ..settings(20)
            },
        );

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(classifier.calls(), 0);

        scheduler.configure(&ConfigureRequest {
            consumption_threshold: Some(1),
            ..Default::default()
        })
        .unwrap();
        scheduler.notify_consumed();
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop().await;

        assert_eq!(classifier.calls(), 1);
        assert_eq!(scheduler.status().current_label.as_deref(), Some("happy"));
    }

    #[tokio::test]
    async fn stop_wakes_sleeping_loop_promptly() {
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            Arc::new(FixedClassifier::new("happy")),
            Arc::new(RecordingDispatcher::default()),
            SchedulerSettings {
                poll_interval: Duration::from_secs(3600),
                ..settings(20)
            },
        );

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let started = std::time::Instant::now();
        scheduler.stop().await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(scheduler.status().current_label.as_deref(), Some("happy"));
    }

    #[tokio::test]
    async fn panicking_loop_backs_off_with_cooldown() {
        let classifier = Arc::new(PanickingClassifier {
            calls: AtomicUsize::new(0),
        });
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            classifier.clone(),
            Arc::new(RecordingDispatcher::default()),
            SchedulerSettings {
                error_cooldown: Duration::from_secs(3600),
                ..settings(10)
            },
        );

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop().await;

        // 쿨다운 중이라 재시도 없음, 루프는 살아 있었고 정상 종료
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn notify_and_reset_counts() {
        let (scheduler, _, _) = fixed("happy");
        assert_eq!(scheduler.notify_consumed(), 1);
        assert_eq!(scheduler.notify_consumed(), 2);
        assert_eq!(scheduler.reset(), 0);
        assert_eq!(scheduler.status().consumption_count, 0);
    }

    #[test]
    fn three_consumptions_make_recheck_due() {
        let (scheduler, _, _) = fixed("happy");
        for _ in 0..3 {
            scheduler.notify_consumed();
        }
        assert_eq!(
            scheduler.shared.due_trigger(Utc::now()),
            Some(Trigger::Policy(RecheckReason::Consumption))
        );
    }

    #[test]
    fn configure_applies_and_rejects_zero() {
        let (scheduler, _, _) = fixed("happy");
        let status = scheduler
            .configure(&ConfigureRequest {
                recheck_interval_secs: Some(60),
                consumption_threshold: Some(5),
            })
            .unwrap();
        assert_eq!(status.recheck_interval_secs, 60);
        assert_eq!(status.consumption_threshold, 5);

        let err = scheduler
            .configure(&ConfigureRequest {
                recheck_interval_secs: Some(120),
                consumption_threshold: Some(0),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        // 부분 적용 없음
        assert_eq!(scheduler.status().recheck_interval_secs, 60);
    }

    #[tokio::test]
    async fn analyze_frame_counts_consumption_without_touching_label() {
        let (scheduler, _, dispatcher) = fixed("angry");
        let frame = Frame::new(b"img".to_vec(), FrameFormat::Png);

        let result = scheduler.analyze_frame(&frame).await;
        assert!(result.success);
        assert_eq!(result.label.as_deref(), Some("angry"));

        let status = scheduler.status();
        assert_eq!(status.consumption_count, 1);
        assert!(status.current_label.is_none());
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn analyze_frame_failure_counts_nothing() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            Arc::new(FailingClassifier),
            dispatcher.clone(),
            settings(20),
        );
        let frame = Frame::new(b"img".to_vec(), FrameFormat::Png);

        let result = scheduler.analyze_frame(&frame).await;
        assert!(!result.success);
        assert!(result.content.is_none());
        assert_eq!(scheduler.status().consumption_count, 0);
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn loop_skips_recheck_finished_by_manual_run() {
        let classifier = Arc::new(SlowClassifier::new("happy", Duration::from_millis(300)));
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let scheduler = Arc::new(scheduler_with(
            Arc::new(StaticSource),
            classifier.clone(),
            dispatcher.clone(),
            SchedulerSettings {
                consumption_threshold: 1,
                initial_check: false,
                ..settings(20)
            },
        ));
        scheduler.notify_consumed();

        let manual = tokio::spawn({
            let scheduler = scheduler.clone();
            async move { scheduler.run_once().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        // 수동 사이클 진행 중에 루프 시작 → 루프는 게이트에서 대기
        scheduler.start();
        let result = manual.await.unwrap().unwrap();
        assert!(result.success);

        tokio::time::sleep(Duration::from_millis(200)).await;
        scheduler.stop().await;

        assert_eq!(classifier.calls(), 1);
        assert_eq!(dispatcher.sent().len(), 1);
        assert_eq!(scheduler.status().consumption_count, 0);
    }

    #[tokio::test]
    async fn stop_gives_up_on_slow_cycle_and_restart_runs_one_loop() {
        let classifier = Arc::new(SlowClassifier::new("sad", Duration::from_millis(300)));
        let scheduler = scheduler_with(
            Arc::new(StaticSource),
            classifier.clone(),
            Arc::new(RecordingDispatcher::default()),
            SchedulerSettings {
                stop_timeout: Duration::from_millis(50),
                ..settings(20)
            },
        );

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(classifier.calls(), 1);

        let started = std::time::Instant::now();
        scheduler.stop().await;
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(40));
        assert!(waited < Duration::from_millis(250));
        assert!(!scheduler.is_running());

        // 이전 루프는 진행 중 사이클을 마치고 세대 불일치로 종료
        scheduler.start();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(classifier.calls(), 1);
        assert_eq!(scheduler.status().current_label.as_deref(), Some("sad"));
        assert_eq!(scheduler.shared.state.lock().generation, 2);

        for _ in 0..3 {
            scheduler.notify_consumed();
        }
        tokio::time::sleep(Duration::from_millis(600)).await;
        scheduler.stop().await;

        assert_eq!(classifier.calls(), 2);
        assert_eq!(scheduler.status().consumption_count, 0);
    }
}
