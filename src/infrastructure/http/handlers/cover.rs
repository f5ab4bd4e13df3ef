//! Cover HTTP Handlers
//!
//! 封面以 PNG 字节直接返回，错误仍走统一 JSON 格式

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{CoverImageResponse, PreviewCover, RenderCover};
use crate::domain::book::ProfileId;
use crate::infrastructure::http::dto::{CoverPreviewRequest, CoverSizeParams};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 背景图是否绘制成功
pub const COVER_BACKGROUND_HEADER: &str = "x-cover-background";

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ApiError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ApiError::Internal(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer.into_inner())
}

async fn png_response(rendered: CoverImageResponse) -> Result<Response, ApiError> {
    let image = rendered.image;
    let bytes = tokio::task::spawn_blocking(move || encode_png(&image))
        .await
        .map_err(|e| ApiError::Internal(format!("PNG encoding task failed: {}", e)))??;
    let background = if rendered.background_loaded {
        "loaded"
    } else {
        "none"
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(header::CACHE_CONTROL, "no-store")
        .header(COVER_BACKGROUND_HEADER, background)
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// 渲染已保存的封面
pub async fn get_cover(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
    Query(params): Query<CoverSizeParams>,
) -> Result<Response, ApiError> {
    let rendered = state
        .render_cover_handler
        .handle(RenderCover {
            profile_id: ProfileId::from_uuid(profile_id),
            width: params.width,
            height: params.height,
            scale: params.scale,
        })
        .await?;

    png_response(rendered).await
}

/// 渲染编辑中的封面（新请求取代同一用户未完成的旧请求）
pub async fn preview_cover(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
    Json(req): Json<CoverPreviewRequest>,
) -> Result<Response, ApiError> {
    let rendered = state
        .preview_cover_handler
        .handle(PreviewCover {
            profile_id: ProfileId::from_uuid(profile_id),
            configuration: req.cover,
            width: req.width,
            height: req.height,
            scale: req.scale,
        })
        .await?;

    png_response(rendered).await
}
