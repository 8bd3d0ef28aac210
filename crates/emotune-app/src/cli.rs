//! 명령줄 인자.

use clap::{Parser, ValueEnum};
use emotune_core::config::{AppConfig, ClassifierBackend};
use std::path::PathBuf;

/// 분류기 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierArg {
    /// 밝기 휴리스틱 (모델 불필요)
    Heuristic,
    /// 원격 추론 서버
    Remote,
}

impl From<ClassifierArg> for ClassifierBackend {
    fn from(arg: ClassifierArg) -> Self {
        match arg {
            ClassifierArg::Heuristic => ClassifierBackend::Heuristic,
            ClassifierArg::Remote => ClassifierBackend::Remote,
        }
    }
}

/// EMOTUNE — 감정 기반 음악 재확인 에이전트
#[derive(Parser, Debug)]
#[command(name = "emotune")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// 제어 API 포트
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// 재확인까지 소비 곡 수
    #[arg(long)]
    pub threshold: Option<u32>,

    /// 재확인 간격 (초)
    #[arg(long)]
    pub interval: Option<u64>,

    /// 정책 평가 간격 (초)
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// 웹캠 스냅샷 파일 경로
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// 감정 분류기
    #[arg(long, value_enum)]
    pub classifier: Option<ClassifierArg>,

    /// 원격 분류기 엔드포인트
    #[arg(long)]
    pub endpoint: Option<String>,

    /// 브라우저를 열지 않고 선택 결과만 로그로 출력
    #[arg(long)]
    pub headless: bool,

    /// 시작과 동시에 재확인 루프 실행
    #[arg(long)]
    pub autostart: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// CLI 값으로 설정 덮어쓰기. 파일에는 저장하지 않는다.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if let Some(threshold) = self.threshold {
            config.recheck.consumption_threshold = threshold;
        }
        if let Some(interval) = self.interval {
            config.recheck.recheck_interval_secs = interval;
        }
        if let Some(poll) = self.poll_interval {
            config.recheck.poll_interval_secs = poll;
        }
        if let Some(ref snapshot) = self.snapshot {
            config.capture.snapshot_path = snapshot.clone();
        }
        if let Some(classifier) = self.classifier {
            config.classifier.backend = classifier.into();
        }
        if let Some(ref endpoint) = self.endpoint {
            config.classifier.endpoint = endpoint.clone();
        }
    }

    /// tracing 필터 문자열
    pub fn log_filter(&self) -> String {
        let level = &self.log_level;
        [
            "emotune",
            "emotune_app",
            "emotune_core",
            "emotune_vision",
            "emotune_network",
            "emotune_engine",
            "emotune_web",
            "tower_http",
        ]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
    }
}
