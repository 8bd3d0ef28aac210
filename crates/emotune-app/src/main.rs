//! # emotune
//!
//! EMOTUNE 바이너리 진입점.
//! 설정 로드, DI 와이어링, 재확인 스케줄러와 제어 API 서버 기동.

use anyhow::{anyhow, Result};
use clap::Parser;
use emotune_app::cli::Args;
use emotune_app::lifecycle::LifecycleManager;
use emotune_app::wiring;
use emotune_core::config::AppConfig;
use emotune_core::config_manager::ConfigManager;
use emotune_web::WebServer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// 배너 출력
fn print_banner(config: &AppConfig, headless: bool) {
    println!();
    println!("╔══════════════════════════════════════════════╗");
    println!("║   EMOTUNE  감정 기반 음악 재확인 에이전트    ║");
    println!("╚══════════════════════════════════════════════╝");
    println!(
        "  재확인: {}곡 또는 {}초마다 (평가 {}초 간격)",
        config.recheck.consumption_threshold,
        config.recheck.recheck_interval_secs,
        config.recheck.poll_interval_secs
    );
    if config.web.enabled {
        println!("  제어 API: http://localhost:{}/api", config.web.port);
    }
    if headless {
        println!("  헤드리스 모드: 브라우저를 열지 않음");
    }
    println!();
}

/// 설정 관리자 로드. 실패하면 파일 없이 기본 설정으로 진행.
fn load_config(args: &Args) -> (Option<ConfigManager>, AppConfig) {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    match manager {
        Ok(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            let config = manager.get();
            (Some(manager), config)
        }
        Err(e) => {
            warn!("설정 파일 로드 실패, 기본 설정 사용: {e}");
            (None, AppConfig::default_config())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())),
        )
        .init();

    let (config_manager, mut config) = load_config(&args);
    args.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow!("설정 검증 실패: {e}"))?;

    print_banner(&config, args.headless);
    info!("EMOTUNE 시작");

    // ── 어댑터 생성 (DI 와이어링) ──
    let dispatcher = wiring::build_dispatcher(args.headless);
    let scheduler = wiring::build_scheduler(&config, dispatcher, wiring::default_rng())
        .map_err(|e| anyhow!("스케줄러 구성 실패: {e}"))?;

    let lifecycle = LifecycleManager::new();

    if args.autostart {
        scheduler.start();
    } else {
        info!("재확인 루프 대기 중 (POST /api/scheduler/start 로 시작)");
    }

    let web_handle = if config.web.enabled {
        let mut server = WebServer::new(scheduler.clone(), config.web.clone())
            .with_upload_limit(config.capture.max_frame_bytes.saturating_mul(2));
        if let Some(manager) = config_manager {
            server = server.with_config_manager(manager);
        }
        let shutdown_rx = lifecycle.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(shutdown_rx).await {
                error!("제어 API 서버 오류: {e}");
            }
        }))
    } else {
        info!("제어 API 비활성화");
        None
    };

    lifecycle
        .wait_for_signal()
        .await
        .map_err(|e| anyhow!("시그널 핸들러 등록 실패: {e}"))?;

    lifecycle.stop_scheduler(&scheduler).await;
    if let Some(handle) = web_handle {
        if let Err(e) = handle.await {
            warn!("웹 서버 태스크 종료 실패: {e}");
        }
    }

    info!("EMOTUNE 종료");
    Ok(())
}
