//! 콘텐츠 참조 모델.

use serde::{Deserialize, Serialize};

/// 콘텐츠 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// 재생목록 전체
    Playlist,
    /// 단일 트랙
    Track,
}

impl ContentKind {
    /// URI 경로로 종류 추론 (`/track/` 포함 시 트랙)
    pub fn infer(uri: &str) -> Self {
        if uri.contains("/track/") || uri.starts_with("spotify:track:") {
            ContentKind::Track
        } else {
            ContentKind::Playlist
        }
    }
}

/// 카탈로그가 선택한 콘텐츠
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    /// 실제로 조회에 사용된 레이블 (미등록 레이블이면 기본 레이블)
    pub label: String,
    /// 전달 대상 URI
    pub uri: String,
    /// 콘텐츠 종류
    pub kind: ContentKind,
}

impl ContentRef {
    /// URI로부터 종류를 추론해 생성
    pub fn new(label: impl Into<String>, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            label: label.into(),
            kind: ContentKind::infer(&uri),
            uri,
        }
    }
}
