//! Narration HTTP Handler

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::NarrateStory;
use crate::domain::book::StoryId;
use crate::infrastructure::http::dto::NarrationRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub const TTS_PROVIDER_HEADER: &str = "x-tts-provider";
pub const TTS_DURATION_HEADER: &str = "x-tts-duration-ms";

/// 朗读故事，直接返回音频字节
///
/// 请求体可省略，此时使用当前服务商与默认音色
pub async fn narrate_story(
    State(state): State<Arc<AppState>>,
    Path(story_id): Path<Uuid>,
    req: Option<Json<NarrationRequest>>,
) -> Result<Response, ApiError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();

    let result = state
        .narrate_story_handler
        .handle(NarrateStory {
            story_id: StoryId::from_uuid(story_id),
            provider: req.provider,
            voice_id: req.voice_id,
        })
        .await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(header::CONTENT_LENGTH, result.audio_data.len())
        .header(TTS_PROVIDER_HEADER, result.provider);

    if let Some(duration_ms) = result.duration_ms {
        builder = builder.header(TTS_DURATION_HEADER, duration_ms);
    }

    builder
        .body(Body::from(result.audio_data))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
