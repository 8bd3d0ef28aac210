//! 원격 감정 분류 클라이언트.
//!
//! 모델 추론 서버(DeepFace 호환 API)에 이미지를 전송하고
//! `{dominant_emotion, emotion: {label: score}}` 응답을 [`EmotionReading`]으로 변환한다.
//! 응답은 단일 객체 또는 얼굴별 배열(첫 번째 사용) 모두 허용.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use emotune_core::config::ClassifierConfig;
use emotune_core::error::CoreError;
use emotune_core::models::emotion::{round_score, EmotionReading};
use emotune_core::models::frame::Frame;
use emotune_core::ports::classifier::EmotionClassifier;

/// 분류기 이름
pub const REMOTE_DETECTOR: &str = "remote-model";

/// 얼굴 1개에 대한 분석 결과
#[derive(Debug, Deserialize)]
struct FaceAnalysis {
    dominant_emotion: String,
    #[serde(default)]
    emotion: BTreeMap<String, f64>,
}

/// 추론 서버 응답 — 객체 또는 배열
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalyzeResponse {
    Single(FaceAnalysis),
    Many(Vec<FaceAnalysis>),
}

/// 원격 모델 분류기 — `EmotionClassifier` 포트 구현
#[derive(Debug)]
pub struct RemoteEmotionClassifier {
    /// HTTP 클라이언트
    http_client: reqwest::Client,
    /// 추론 엔드포인트 URL
    endpoint: String,
}

impl RemoteEmotionClassifier {
    /// 새 클라이언트 생성
    pub fn new(config: &ClassifierConfig) -> Result<Self, CoreError> {
        if config.endpoint.trim().is_empty() {
            return Err(CoreError::Config("분류기 엔드포인트 미설정".into()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        debug!(
            endpoint = %config.endpoint,
            timeout = config.timeout_secs,
            "RemoteEmotionClassifier 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// 응답 본문 파싱
    fn parse_response(body: &str) -> Result<EmotionReading, CoreError> {
        let response: AnalyzeResponse = serde_json::from_str(body).map_err(|e| {
            CoreError::ClassificationFailed(format!("응답 JSON 파싱 실패: {}", e))
        })?;

        let face = match response {
            AnalyzeResponse::Single(face) => face,
            AnalyzeResponse::Many(faces) => faces.into_iter().next().ok_or_else(|| {
                CoreError::ClassificationFailed("응답에 분석 결과가 없음".to_string())
            })?,
        };

        let label = face.dominant_emotion.trim().to_lowercase();
        if label.is_empty() {
            return Err(CoreError::ClassificationFailed(
                "dominant_emotion이 비어 있음".to_string(),
            ));
        }

        let scores = face
            .emotion
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), round_score(v)))
            .collect();

        Ok(EmotionReading::new(label, scores, REMOTE_DETECTOR))
    }
}

#[async_trait]
impl EmotionClassifier for RemoteEmotionClassifier {
    async fn classify(&self, frame: &Frame) -> Result<EmotionReading, CoreError> {
        let request_body = serde_json::json!({
            "image": format!("data:{};base64,{}", frame.format.mime(), frame.to_base64()),
            "actions": ["emotion"],
            "enforce_detection": false,
        });

        debug!(
            endpoint = %self.endpoint,
            image_size = frame.data.len(),
            "원격 분류 API 호출"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("분류 API 호출 실패: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("분류 API 응답 읽기 실패: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "분류 API 오류 응답");
            return Err(CoreError::ClassificationFailed(format!(
                "분류 API 오류 ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let reading = Self::parse_response(&body)?;
        info!("모델 감지 감정: {} ({:.1}%)", reading.label, reading.confidence);
        Ok(reading)
    }

    fn detector_name(&self) -> &str {
        REMOTE_DETECTOR
    }
}
