//! 라이프사이클 관리.
//!
//! 종료 신호 전파, OS 시그널 대기, 스케줄러 정리.

use emotune_engine::Scheduler;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
}

impl LifecycleManager {
    /// 새 라이프사이클 관리자 생성
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self { shutdown_tx }
    }

    /// 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 종료 신호 발송
    pub fn shutdown(&self) {
        info!("종료 신호 발송");
        self.shutdown_tx.send_replace(true);
    }

    /// OS 시그널 대기 (SIGINT, SIGTERM) 후 종료 신호 발송
    pub async fn wait_for_signal(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;

            tokio::select! {
                _ = sigint.recv() => info!("SIGINT 수신"),
                _ = sigterm.recv() => info!("SIGTERM 수신"),
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await?;
            info!("Ctrl+C 수신");
        }

        self.shutdown();
        Ok(())
    }

    /// 스케줄러 정지 (진행 중 사이클은 stop_timeout까지 대기)
    pub async fn stop_scheduler(&self, scheduler: &Arc<Scheduler>) {
        if scheduler.is_running() {
            scheduler.stop().await;
        }
        let status = scheduler.status();
        info!(
            "스케줄러 정리 완료: 사이클 {}회 (실패 {}회)",
            status.cycles_attempted, status.cycles_failed
        );
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
