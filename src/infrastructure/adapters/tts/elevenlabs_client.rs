//! ElevenLabs Client - 调用 ElevenLabs 文本转语音 REST API
//!
//! POST {base_url}/v1/text-to-speech/{voice_id}
//! Headers: xi-api-key, Accept: audio/mpeg
//! Request: {"text": "...", "model_id": "..."}
//! Response: audio/mpeg 二进制

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use super::map_send_error;
use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

const API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// 默认音色
    pub voice_id: String,
    pub model_id: String,
    pub timeout_secs: u64,
}

impl ElevenLabsClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.elevenlabs.io".to_string(),
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            timeout_secs: 120,
        }
    }
}

/// ElevenLabs 客户端
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsClientConfig) -> Result<Self, TtsError> {
        if config.api_key.trim().is_empty() {
            return Err(TtsError::ServiceError("ElevenLabs API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

#[async_trait]
impl TtsEnginePort for ElevenLabsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let voice_id = request
            .voice_id
            .as_deref()
            .unwrap_or(&self.config.voice_id)
            .to_string();

        tracing::debug!(
            voice_id = %voice_id,
            model_id = %self.config.model_id,
            text_len = request.text.len(),
            "Sending ElevenLabs request"
        );

        let response = self
            .client
            .post(self.speech_url(&voice_id))
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&ElevenLabsRequest {
                text: &request.text,
                model_id: &self.config.model_id,
            })
            .send()
            .await
            .map_err(|e| map_send_error(e, "ElevenLabs"))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TtsError::VoiceNotFound(voice_id));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "ElevenLabs HTTP {}: {}",
                status, error_text
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(TtsError::InvalidResponse("Empty audio body".to_string()));
        }

        tracing::info!(
            voice_id = %voice_id,
            audio_size = audio_data.len(),
            "ElevenLabs synthesis completed"
        );

        Ok(SynthesisResponse {
            audio_data,
            content_type,
            duration_ms: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };

    async fn speech(
        Path(voice_id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> axum::response::Response {
        if headers.get("xi-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
            return (StatusCode::UNAUTHORIZED, "bad key").into_response();
        }
        if voice_id == "unknown" {
            return (StatusCode::NOT_FOUND, "voice not found").into_response();
        }
        let payload = format!(
            "{}|{}|{}",
            voice_id,
            body["model_id"].as_str().unwrap_or_default(),
            body["text"].as_str().unwrap_or_default()
        );
        ([("content-type", "audio/mpeg")], payload).into_response()
    }

    async fn client(api_key: &str) -> ElevenLabsClient {
        let router = Router::new().route("/v1/text-to-speech/:voice_id", post(speech));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let mut config = ElevenLabsClientConfig::new(api_key);
        config.base_url = format!("http://{}", addr);
        config.voice_id = "rachel".to_string();
        ElevenLabsClient::new(config).unwrap()
    }

    fn request(voice_id: Option<&str>) -> SynthesisRequest {
        SynthesisRequest {
            text: "The lake was cold".to_string(),
            voice_id: voice_id.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(ElevenLabsClient::new(ElevenLabsClientConfig::new("  ")).is_err());
    }

    #[tokio::test]
    async fn test_synthesize_sends_key_and_model() {
        let elevenlabs = client("secret").await;
        let response = elevenlabs.synthesize(request(None)).await.unwrap();
        assert_eq!(response.content_type, "audio/mpeg");
        assert_eq!(
            String::from_utf8(response.audio_data).unwrap(),
            "rachel|eleven_multilingual_v2|The lake was cold"
        );
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let accepted = client("secret").await;
        assert!(matches!(
            accepted.synthesize(request(Some("unknown"))).await,
            Err(TtsError::VoiceNotFound(v)) if v == "unknown"
        ));

        let rejected = client("wrong").await;
        assert!(matches!(
            rejected.synthesize(request(None)).await,
            Err(TtsError::ServiceError(msg)) if msg.contains("401")
        ));
    }
}
