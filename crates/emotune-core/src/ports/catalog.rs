//! 콘텐츠 카탈로그 포트.

use crate::models::content::ContentRef;

/// 레이블별 콘텐츠 선택.
///
/// 실패하지 않는다 — 미등록 레이블은 기본 레이블로 대체해 조회한다.
pub trait ContentCatalog: Send + Sync {
    /// 레이블에 맞는 콘텐츠 1개 선택
    fn select_for(&self, label: &str) -> ContentRef;

    /// 등록된 레이블 목록
    fn labels(&self) -> Vec<String>;
}
