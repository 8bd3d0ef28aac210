//! 프레임 획득 포트.
//!
//! 구현: `emotune-vision` crate (스냅샷 파일, data URL)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::Frame;

/// 프레임 소스 — 분류에 사용할 이미지 1장을 획득
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// 프레임 캡처.
    ///
    /// 장치를 열 수 없으면 `CoreError::DeviceUnavailable`,
    /// 열었지만 프레임을 읽지 못하면 `CoreError::ReadFailed`.
    async fn capture(&self) -> Result<Frame, CoreError>;

    /// 소스 이름 (로그용)
    fn source_name(&self) -> &str;
}
