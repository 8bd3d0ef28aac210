//! 콘텐츠 전달 어댑터.
//!
//! - [`BrowserDispatcher`] — OS 기본 핸들러(브라우저/Spotify 앱)로 URI 열기
//! - [`LogDispatcher`] — 헤드리스 모드. 로그만 남긴다.

use async_trait::async_trait;
use emotune_core::error::CoreError;
use emotune_core::models::content::ContentRef;
use emotune_core::ports::dispatcher::ContentDispatcher;
use tokio::process::Command;
use tracing::{debug, info};

/// 플랫폼 기본 opener 명령
fn opener_command(uri: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(uri);
        cmd
    }

    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        // start의 첫 인자는 창 제목
        cmd.args(["/C", "start", "", uri]);
        cmd
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(uri);
        cmd
    }
}

/// OS 기본 핸들러로 콘텐츠 열기
#[derive(Debug, Default, Clone)]
pub struct BrowserDispatcher;

impl BrowserDispatcher {
    /// 새 전달자 생성
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentDispatcher for BrowserDispatcher {
    async fn dispatch(&self, content: &ContentRef) -> Result<(), CoreError> {
        if content.uri.is_empty() {
            return Err(CoreError::DispatchFailed(format!(
                "빈 URI ({})",
                content.label
            )));
        }

        let status = opener_command(&content.uri)
            .status()
            .await
            .map_err(|e| CoreError::DispatchFailed(format!("opener 실행 실패: {e}")))?;

        if !status.success() {
            return Err(CoreError::DispatchFailed(format!(
                "opener 종료 코드 {:?}: {}",
                status.code(),
                content.uri
            )));
        }

        debug!("콘텐츠 열기 완료: {}", content.uri);
        Ok(())
    }
}

/// 로그 전용 전달자
#[derive(Debug, Default, Clone)]
pub struct LogDispatcher;

#[async_trait]
impl ContentDispatcher for LogDispatcher {
    async fn dispatch(&self, content: &ContentRef) -> Result<(), CoreError> {
        info!(
            label = %content.label,
            kind = ?content.kind,
            "콘텐츠 선택: {}",
            content.uri
        );
        Ok(())
    }
}
