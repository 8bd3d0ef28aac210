//! # emotune-engine
//!
//! 감정 재확인 엔진.
//!
//! - [`catalog`] — 설정 기반 레이블 → 콘텐츠 카탈로그
//! - [`dispatcher`] — 콘텐츠 전달 어댑터 (브라우저, 로그)
//! - [`cycle`] — 캡처 → 분류 → 선택 1회 실행
//! - [`scheduler`] — 백그라운드 재확인 루프와 공유 상태

pub mod catalog;
pub mod cycle;
pub mod dispatcher;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use cycle::SampleCycle;
pub use scheduler::{Scheduler, SchedulerSettings};
