//! API 핸들러 모듈.

pub mod analyze;
pub mod health;
pub mod scheduler;
pub mod settings;
