//! # emotune-web
//!
//! 스케줄러 제어 HTTP API 서버 (Axum).
//!
//! ## 기능
//! - 재확인 루프 시작/정지/상태 조회
//! - 트리거 값 변경, 소비 기록/초기화, 즉시 재확인
//! - 업로드 이미지 감정 분석
//! - 설정 조회, 헬스 체크

pub mod error;
pub mod handlers;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use axum::Router;
use emotune_core::config::WebConfig;
use emotune_core::config_manager::ConfigManager;
use emotune_engine::Scheduler;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 기본 업로드 본문 한도 (bytes)
pub const DEFAULT_UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 재확인 스케줄러
    pub scheduler: Arc<Scheduler>,
    /// 설정 관리자 (있으면 변경 사항을 파일에 저장)
    pub config_manager: Option<ConfigManager>,
}

impl AppState {
    /// 새 상태 생성
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self {
            scheduler,
            config_manager: None,
        }
    }
}

/// 라우터 구성 (CORS, 요청 추적 포함)
pub fn build_router(state: AppState, upload_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes(upload_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 제어 API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
    upload_limit: usize,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(scheduler: Arc<Scheduler>, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState::new(scheduler),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    /// 설정 관리자 설정
    pub fn with_config_manager(mut self, config_manager: ConfigManager) -> Self {
        self.state.config_manager = Some(config_manager);
        self
    }

    /// 업로드 본문 한도 설정
    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.upload_limit = bytes;
        self
    }

    /// 서버 실행
    ///
    /// 설정 포트가 사용 중이면 다음 포트를 순서대로 시도한다 (최대 10개).
    /// `shutdown_rx`가 `true`가 되면 진행 중 요청을 마치고 종료한다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host: [u8; 4] = if self.config.allow_external {
            [0, 0, 0, 0]
        } else {
            [127, 0, 0, 1]
        };

        let app = build_router(self.state, self.upload_limit);
        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let Some(port) = base_port.checked_add(attempt) else {
                break;
            };
            let addr = SocketAddr::from((host, port));

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {} 사용 불가, 대체 포트 {} 사용", base_port, port);
                    }
                    info!("제어 API 서버 시작: http://{}", addr);

                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("웹 서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    info!("제어 API 서버 종료");
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                    warn!("포트 {} 이미 사용 중, 다음 포트 시도", port);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}
