//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    BookPageResponse, BookPaginationResponse, StorySummary, TtsProvidersResponse,
};
use crate::domain::book::{BookPage, StoryMediaItem};
use crate::domain::cover::CoverConfiguration;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Book DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StorySummaryDto {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub start_page: usize,
    pub text_pages: usize,
    pub media_pages: usize,
}

impl From<StorySummary> for StorySummaryDto {
    fn from(summary: StorySummary) -> Self {
        Self {
            id: *summary.id.as_uuid(),
            title: summary.title,
            created_at: summary.created_at,
            start_page: summary.span.start,
            text_pages: summary.span.text_pages,
            media_pages: summary.span.media_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookSummaryDto {
    pub total_page_count: usize,
    pub story_start_indices: Vec<usize>,
    pub stories: Vec<StorySummaryDto>,
}

impl From<BookPaginationResponse> for BookSummaryDto {
    fn from(response: BookPaginationResponse) -> Self {
        Self {
            total_page_count: response.total_page_count,
            story_start_indices: response.story_start_indices,
            stories: response.stories.into_iter().map(StorySummaryDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MediaItemDto {
    pub id: Uuid,
    pub content_type: String,
    pub kind: &'static str,
    pub file_path: String,
    pub caption: Option<String>,
}

impl From<StoryMediaItem> for MediaItemDto {
    fn from(item: StoryMediaItem) -> Self {
        Self {
            id: *item.id().as_uuid(),
            content_type: item.content_type().to_string(),
            kind: item.kind().as_str(),
            file_path: item.file_path().to_string(),
            caption: item.caption().map(str::to_string),
        }
    }
}

/// 书页内容，按 `kind` 区分
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContentDto {
    Cover,
    Text {
        page_within_story: usize,
        is_first_page: bool,
        paragraphs: Vec<String>,
    },
    Media {
        page_within_story: usize,
        items: Vec<MediaItemDto>,
    },
}

impl From<BookPage> for PageContentDto {
    fn from(page: BookPage) -> Self {
        match page {
            BookPage::Cover => PageContentDto::Cover,
            BookPage::Text {
                page_within_story,
                is_first_page,
                paragraphs,
                ..
            } => PageContentDto::Text {
                page_within_story,
                is_first_page,
                paragraphs,
            },
            BookPage::Media {
                page_within_story,
                items,
                ..
            } => PageContentDto::Media {
                page_within_story,
                items: items.into_iter().map(MediaItemDto::from).collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookPageDto {
    pub page: usize,
    pub total_page_count: usize,
    pub story: Option<StorySummaryDto>,
    pub content: PageContentDto,
}

impl From<BookPageResponse> for BookPageDto {
    fn from(response: BookPageResponse) -> Self {
        Self {
            page: response.page,
            total_page_count: response.total_page_count,
            story: response.story.map(StorySummaryDto::from),
            content: response.content.into(),
        }
    }
}

// ============================================================================
// Cover DTOs
// ============================================================================

/// 封面尺寸查询参数
#[derive(Debug, Default, Deserialize)]
pub struct CoverSizeParams {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
}

/// 封面预览请求
#[derive(Debug, Deserialize)]
pub struct CoverPreviewRequest {
    #[serde(default)]
    pub cover: CoverConfiguration,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
}

// ============================================================================
// TTS DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TtsProvidersDto {
    pub providers: Vec<String>,
    pub active: Option<String>,
}

impl From<TtsProvidersResponse> for TtsProvidersDto {
    fn from(response: TtsProvidersResponse) -> Self {
        Self {
            providers: response.providers,
            active: response.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveProviderRequest {
    pub provider: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NarrationRequest {
    pub provider: Option<String>,
    pub voice_id: Option<String>,
}
