//! 감정 분류 포트.
//!
//! 구현:
//! - `emotune-network::RemoteEmotionClassifier` — 모델 추론 서버 호출
//! - `emotune-vision::HeuristicClassifier` — 밝기 기반 가중 무작위

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::emotion::EmotionReading;
use crate::models::frame::Frame;

/// 감정 분류기 — 두 구현 모두 동일한 [`EmotionReading`]을 반환하므로
/// 스케줄러는 어느 쪽이 쓰이는지 알 필요가 없다.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// 프레임 분류
    async fn classify(&self, frame: &Frame) -> Result<EmotionReading, CoreError>;

    /// 분류기 이름
    fn detector_name(&self) -> &str;
}
