//! 캡처 프레임 모델.
//!
//! 웹캠 스냅샷 또는 업로드된 data URL에서 얻은 인코딩된 이미지 바이트.
//! 디코딩은 분류기 어댑터가 담당한다.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 이미지 인코딩 포맷
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    Jpeg,
    Png,
    Webp,
    /// 헤더로 판별하지 못한 경우 — 디코더가 자동 감지
    Unknown,
}

impl FrameFormat {
    /// MIME 타입 (`image/jpeg` 등)에서 포맷 추론
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => FrameFormat::Jpeg,
            "image/png" => FrameFormat::Png,
            "image/webp" => FrameFormat::Webp,
            _ => FrameFormat::Unknown,
        }
    }

    /// 파일 확장자에서 포맷 추론
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => FrameFormat::Jpeg,
            "png" => FrameFormat::Png,
            "webp" => FrameFormat::Webp,
            _ => FrameFormat::Unknown,
        }
    }

    /// 원격 API 전송용 MIME 타입
    pub fn mime(&self) -> &'static str {
        match self {
            FrameFormat::Jpeg => "image/jpeg",
            FrameFormat::Png => "image/png",
            FrameFormat::Webp => "image/webp",
            FrameFormat::Unknown => "application/octet-stream",
        }
    }
}

/// 캡처된 프레임
#[derive(Debug, Clone)]
pub struct Frame {
    /// 인코딩된 이미지 바이트
    pub data: Vec<u8>,
    /// 인코딩 포맷
    pub format: FrameFormat,
    /// 캡처 시각
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    /// 현재 시각으로 새 프레임 생성
    pub fn new(data: Vec<u8>, format: FrameFormat) -> Self {
        Self {
            data,
            format,
            captured_at: Utc::now(),
        }
    }

    /// `data:image/jpeg;base64,...` 형식 문자열에서 프레임 생성.
    ///
    /// 접두사가 없으면 전체 문자열을 Base64 본문으로 간주한다.
    pub fn from_data_url(input: &str) -> Result<Self, CoreError> {
        let input = input.trim();
        let (format, payload) = match input.split_once(',') {
            Some((header, body)) => {
                let mime = header
                    .strip_prefix("data:")
                    .and_then(|h| h.split(';').next())
                    .unwrap_or_default();
                (FrameFormat::from_mime(mime), body)
            }
            None => (FrameFormat::Unknown, input),
        };

        if payload.is_empty() {
            return Err(CoreError::ReadFailed("이미지 데이터가 비어 있음".to_string()));
        }

        let data = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| CoreError::ReadFailed(format!("Base64 디코딩 실패: {e}")))?;

        Ok(Self::new(data, format))
    }

    /// 원격 분류기 전송용 Base64 본문
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}
