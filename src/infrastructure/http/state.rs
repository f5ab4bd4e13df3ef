//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    NarrateStoryHandler, SetActiveTtsProviderHandler,
    // Query handlers
    GetBookPageHandler, GetBookPaginationHandler, GetBookProgressHandler, ListTtsProvidersHandler,
    PreviewCoverHandler, RenderCoverHandler,
    // Rendering
    CoverRenderSettings, CoverRenderer, RenderSupervisor,
    // Ports
    CoverRasterizerPort, CoverRepositoryPort, ImageLoaderPort, StoryRepositoryPort,
    TtsProviderRegistry,
};
use crate::domain::book::{PageEstimator, DEFAULT_MINIMUM_PAGES};

/// 业务参数
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub estimator: PageEstimator,
    pub minimum_pages: usize,
    pub cover: CoverRenderSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            estimator: PageEstimator::default(),
            minimum_pages: DEFAULT_MINIMUM_PAGES,
            cover: CoverRenderSettings::default(),
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub story_repo: Arc<dyn StoryRepositoryPort>,
    pub cover_repo: Arc<dyn CoverRepositoryPort>,
    pub tts_registry: Arc<TtsProviderRegistry>,
    pub render_supervisor: Arc<RenderSupervisor>,

    // ========== Command Handlers ==========
    pub narrate_story_handler: NarrateStoryHandler,
    pub set_active_tts_provider_handler: SetActiveTtsProviderHandler,

    // ========== Query Handlers ==========
    pub get_book_pagination_handler: GetBookPaginationHandler,
    pub get_book_page_handler: GetBookPageHandler,
    pub get_book_progress_handler: GetBookProgressHandler,
    pub render_cover_handler: RenderCoverHandler,
    pub preview_cover_handler: PreviewCoverHandler,
    pub list_tts_providers_handler: ListTtsProvidersHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        cover_repo: Arc<dyn CoverRepositoryPort>,
        image_loader: Arc<dyn ImageLoaderPort>,
        rasterizer: Arc<dyn CoverRasterizerPort>,
        tts_registry: Arc<TtsProviderRegistry>,
        settings: AppSettings,
    ) -> Self {
        let renderer = Arc::new(CoverRenderer::new(image_loader, rasterizer));
        let render_supervisor = Arc::new(RenderSupervisor::new());

        Self {
            // Ports
            story_repo: story_repo.clone(),
            cover_repo: cover_repo.clone(),
            tts_registry: tts_registry.clone(),
            render_supervisor: render_supervisor.clone(),

            // Command handlers
            narrate_story_handler: NarrateStoryHandler::new(
                story_repo.clone(),
                tts_registry.clone(),
            ),
            set_active_tts_provider_handler: SetActiveTtsProviderHandler::new(
                tts_registry.clone(),
            ),

            // Query handlers
            get_book_pagination_handler: GetBookPaginationHandler::new(
                story_repo.clone(),
                settings.estimator.clone(),
            ),
            get_book_page_handler: GetBookPageHandler::new(
                story_repo.clone(),
                settings.estimator.clone(),
            ),
            get_book_progress_handler: GetBookProgressHandler::new(
                story_repo.clone(),
                settings.estimator.clone(),
                settings.minimum_pages,
            ),
            render_cover_handler: RenderCoverHandler::new(
                cover_repo.clone(),
                renderer.clone(),
                settings.cover.clone(),
            ),
            preview_cover_handler: PreviewCoverHandler::new(
                renderer,
                render_supervisor,
                settings.cover,
            ),
            list_tts_providers_handler: ListTtsProvidersHandler::new(tts_registry),
        }
    }
}
