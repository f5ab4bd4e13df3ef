//! Book HTTP Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{GetBookPage, GetBookPagination, GetBookProgress};
use crate::domain::book::{BookProgress, ProfileId};
use crate::infrastructure::http::dto::{ApiResponse, BookPageDto, BookSummaryDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 成书分页概要
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookSummaryDto>>, ApiError> {
    let response = state
        .get_book_pagination_handler
        .handle(GetBookPagination {
            profile_id: ProfileId::from_uuid(profile_id),
        })
        .await?;

    Ok(Json(ApiResponse::success(response.into())))
}

/// 成书进度
pub async fn get_book_progress(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookProgress>>, ApiError> {
    let progress = state
        .get_book_progress_handler
        .handle(GetBookProgress {
            profile_id: ProfileId::from_uuid(profile_id),
        })
        .await?;

    Ok(Json(ApiResponse::success(progress)))
}

/// 单页内容
pub async fn get_book_page(
    State(state): State<Arc<AppState>>,
    Path((profile_id, page)): Path<(Uuid, usize)>,
) -> Result<Json<ApiResponse<BookPageDto>>, ApiError> {
    let response = state
        .get_book_page_handler
        .handle(GetBookPage {
            profile_id: ProfileId::from_uuid(profile_id),
            page,
        })
        .await?;

    Ok(Json(ApiResponse::success(response.into())))
}
