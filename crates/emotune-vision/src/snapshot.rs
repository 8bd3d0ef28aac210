//! 스냅샷 파일 프레임 소스.
//!
//! `FrameSource` 포트 구현. 외부 웹캠 캡처 에이전트가 주기적으로 덮어쓰는
//! 이미지 파일을 읽는다.

use async_trait::async_trait;
use emotune_core::error::CoreError;
use emotune_core::models::frame::{Frame, FrameFormat};
use emotune_core::ports::frame_source::FrameSource;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 스냅샷 파일 프레임 소스
#[derive(Debug, Clone)]
pub struct SnapshotFrameSource {
    path: PathBuf,
    max_bytes: usize,
}

impl SnapshotFrameSource {
    /// 새 소스 생성
    pub fn new(path: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }

    /// 스냅샷 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FrameSource for SnapshotFrameSource {
    async fn capture(&self) -> Result<Frame, CoreError> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => CoreError::DeviceUnavailable(
                format!("스냅샷을 열 수 없음: {}: {e}", self.path.display()),
            ),
            _ => CoreError::ReadFailed(format!("스냅샷 읽기 실패: {}: {e}", self.path.display())),
        })?;

        if data.is_empty() {
            return Err(CoreError::ReadFailed(format!(
                "빈 스냅샷: {}",
                self.path.display()
            )));
        }
        if data.len() > self.max_bytes {
            return Err(CoreError::ReadFailed(format!(
                "스냅샷 크기 초과: {} bytes (최대 {})",
                data.len(),
                self.max_bytes
            )));
        }

        let format = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(FrameFormat::from_extension)
            .unwrap_or(FrameFormat::Unknown);

        debug!("스냅샷 로드: {} ({} bytes)", self.path.display(), data.len());
        Ok(Frame::new(data, format))
    }

    fn source_name(&self) -> &str {
        "snapshot"
    }
}
