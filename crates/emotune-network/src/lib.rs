//! # emotune-network
//!
//! 네트워크 어댑터.
//! 외부 모델 추론 서버(DeepFace 등)를 호출하는 `EmotionClassifier` 구현을 제공한다.

pub mod remote_classifier;

pub use remote_classifier::RemoteEmotionClassifier;
