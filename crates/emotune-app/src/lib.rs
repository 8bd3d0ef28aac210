//! # emotune-app
//!
//! EMOTUNE 바이너리의 조립 계층.
//! CLI 인자 → 설정 오버라이드 → 어댑터 생성(DI) → 스케줄러/웹 서버 기동.

pub mod cli;
pub mod lifecycle;
pub mod wiring;
