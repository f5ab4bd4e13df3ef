//! Book Query Handlers

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::StoryRepositoryPort;
use crate::application::queries::{GetBookPage, GetBookPagination, GetBookProgress};
use crate::domain::book::{
    BookPage, BookProgress, PageEstimator, PaginationResult, StoryId, StorySpan, StoryWithMedia,
};

// ============================================================================
// Response DTOs
// ============================================================================

/// 书中单个故事的概要
#[derive(Debug, Clone)]
pub struct StorySummary {
    pub id: StoryId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub span: StorySpan,
}

impl StorySummary {
    fn new(entry: &StoryWithMedia, span: StorySpan) -> Self {
        Self {
            id: entry.story.id(),
            title: entry.story.display_title().to_string(),
            created_at: entry.story.created_at(),
            span,
        }
    }
}

/// 分页概要响应
#[derive(Debug, Clone)]
pub struct BookPaginationResponse {
    pub total_page_count: usize,
    pub story_start_indices: Vec<usize>,
    pub stories: Vec<StorySummary>,
}

impl BookPaginationResponse {
    fn new(stories: &[StoryWithMedia], pagination: PaginationResult) -> Self {
        let summaries = stories
            .iter()
            .zip(pagination.spans.iter())
            .map(|(entry, span)| StorySummary::new(entry, *span))
            .collect();

        Self {
            total_page_count: pagination.total_page_count,
            story_start_indices: pagination.story_start_indices,
            stories: summaries,
        }
    }
}

/// 书页响应
#[derive(Debug, Clone)]
pub struct BookPageResponse {
    pub page: usize,
    pub total_page_count: usize,
    /// 所属故事，封面页为 None
    pub story: Option<StorySummary>,
    pub content: BookPage,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetBookPagination Handler
pub struct GetBookPaginationHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    estimator: PageEstimator,
}

impl GetBookPaginationHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, estimator: PageEstimator) -> Self {
        Self {
            story_repo,
            estimator,
        }
    }

    pub async fn handle(
        &self,
        query: GetBookPagination,
    ) -> Result<BookPaginationResponse, ApplicationError> {
        let stories = self.story_repo.find_by_profile(query.profile_id).await?;
        let pagination = self.estimator.paginate(&stories);

        tracing::debug!(
            profile_id = %query.profile_id,
            stories = stories.len(),
            total_pages = pagination.total_page_count,
            "Book paginated"
        );

        Ok(BookPaginationResponse::new(&stories, pagination))
    }
}

/// GetBookPage Handler
pub struct GetBookPageHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    estimator: PageEstimator,
}

impl GetBookPageHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, estimator: PageEstimator) -> Self {
        Self {
            story_repo,
            estimator,
        }
    }

    pub async fn handle(&self, query: GetBookPage) -> Result<BookPageResponse, ApplicationError> {
        let stories = self.story_repo.find_by_profile(query.profile_id).await?;
        let pagination = self.estimator.paginate(&stories);

        let content = self
            .estimator
            .resolve_page(&stories, &pagination, query.page)
            .ok_or_else(|| {
                ApplicationError::validation(format!(
                    "page {} out of range (book has {} pages)",
                    query.page, pagination.total_page_count
                ))
            })?;

        let story = content.story_index().and_then(|index| {
            let entry = stories.get(index)?;
            let span = pagination.span(index)?;
            Some(StorySummary::new(entry, *span))
        });

        Ok(BookPageResponse {
            page: query.page,
            total_page_count: pagination.total_page_count,
            story,
            content,
        })
    }
}

/// GetBookProgress Handler
pub struct GetBookProgressHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    estimator: PageEstimator,
    minimum_pages: usize,
}

impl GetBookProgressHandler {
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        estimator: PageEstimator,
        minimum_pages: usize,
    ) -> Self {
        Self {
            story_repo,
            estimator,
            minimum_pages,
        }
    }

    pub async fn handle(&self, query: GetBookProgress) -> Result<BookProgress, ApplicationError> {
        let stories = self.story_repo.find_by_profile(query.profile_id).await?;
        let pagination = self.estimator.paginate(&stories);

        Ok(BookProgress::new(
            pagination.total_page_count,
            stories.len(),
            self.minimum_pages,
        ))
    }
}
