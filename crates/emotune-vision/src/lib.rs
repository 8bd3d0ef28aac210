//! # emotune-vision
//!
//! 프레임 획득과 이미지 기반 분류 어댑터.
//! 외부 웹캠 에이전트가 남긴 스냅샷 파일을 읽고,
//! ML 의존성 없이 밝기 통계로 감정 레이블을 추정한다.

pub mod heuristic;
pub mod snapshot;
pub mod stats;
