//! 콘텐츠 전달 포트.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::content::ContentRef;

/// 선택된 콘텐츠를 외부로 전달 (fire-and-forget).
///
/// 실패는 호출자가 로그만 남기고 전파하지 않는다.
#[async_trait]
pub trait ContentDispatcher: Send + Sync {
    /// 콘텐츠 전달
    async fn dispatch(&self, content: &ContentRef) -> Result<(), CoreError>;
}
