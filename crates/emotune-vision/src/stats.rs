//! 이미지 통계.

use emotune_core::error::CoreError;
use emotune_core::models::frame::{Frame, FrameFormat};
use image::{DynamicImage, ImageFormat};

/// 프레임 디코딩. 포맷을 모르면 헤더로 자동 감지.
pub fn decode(frame: &Frame) -> Result<DynamicImage, CoreError> {
    let hint = match frame.format {
        FrameFormat::Jpeg => Some(ImageFormat::Jpeg),
        FrameFormat::Png => Some(ImageFormat::Png),
        FrameFormat::Webp => Some(ImageFormat::WebP),
        FrameFormat::Unknown => None,
    };

    let decoded = match hint {
        Some(format) => image::load_from_memory_with_format(&frame.data, format)
            .or_else(|_| image::load_from_memory(&frame.data)),
        None => image::load_from_memory(&frame.data),
    };

    decoded.map_err(|e| CoreError::ReadFailed(format!("이미지 디코딩 실패: {e}")))
}

/// 그레이스케일 평균 밝기 (0.0 ~ 255.0)
pub fn mean_brightness(image: &DynamicImage) -> Result<f64, CoreError> {
    let gray = image.to_luma8();
    let pixels = u64::from(gray.width()) * u64::from(gray.height());
    if pixels == 0 {
        return Err(CoreError::ReadFailed("빈 이미지".to_string()));
    }

    let sum: u64 = gray.pixels().map(|p| u64::from(p.0[0])).sum();
    Ok(sum as f64 / pixels as f64)
}
