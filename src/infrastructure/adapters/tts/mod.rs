//! TTS Adapter - 语音合成服务商客户端实现

mod elevenlabs_client;
mod http_tts_client;

pub use elevenlabs_client::*;
pub use http_tts_client::*;

/// 自建 HTTP 服务商名称
pub const HTTP_PROVIDER: &str = "http";

/// ElevenLabs 服务商名称
pub const ELEVENLABS_PROVIDER: &str = "elevenlabs";

/// 将 reqwest 错误映射为 TtsError
fn map_send_error(e: reqwest::Error, service: &str) -> crate::application::ports::TtsError {
    use crate::application::ports::TtsError;

    if e.is_timeout() {
        TtsError::Timeout
    } else if e.is_connect() {
        TtsError::NetworkError(format!("Cannot connect to {}: {}", service, e))
    } else {
        TtsError::NetworkError(e.to_string())
    }
}
