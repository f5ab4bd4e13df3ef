//! TTS Provider HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ListTtsProviders, SetActiveTtsProvider};
use crate::infrastructure::http::dto::{ApiResponse, SetActiveProviderRequest, TtsProvidersDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出已注册的服务商
pub async fn list_tts_providers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<TtsProvidersDto>>, ApiError> {
    let response = state
        .list_tts_providers_handler
        .handle(ListTtsProviders)
        .await?;

    Ok(Json(ApiResponse::success(response.into())))
}

/// 切换当前服务商
pub async fn set_active_tts_provider(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetActiveProviderRequest>,
) -> Result<Json<ApiResponse<TtsProvidersDto>>, ApiError> {
    let response = state
        .set_active_tts_provider_handler
        .handle(SetActiveTtsProvider {
            provider: req.provider,
        })
        .await?;

    Ok(Json(ApiResponse::success(response.into())))
}
