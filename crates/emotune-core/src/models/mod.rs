//! EMOTUNE 도메인 모델.
//!
//! 캡처 → 분류 → 선택 파이프라인과 스케줄러 상태 조회에 쓰이는 데이터 구조체.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod content;
pub mod cycle;
pub mod emotion;
pub mod frame;
pub mod scheduler;
