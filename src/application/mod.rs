//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（StoryRepository、CoverRepository、ImageLoader、CoverRasterizer、TtsEngine）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - render_supervisor: 封面预览渲染令牌
//! - tts_registry: TTS 服务商注册表
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod render_supervisor;
pub mod tts_registry;

// Re-exports
pub use commands::{
    handlers::{
        NarrateStoryHandler, NarrationResponse, SetActiveTtsProviderHandler,
    },
    NarrateStory, SetActiveTtsProvider,
};

pub use error::ApplicationError;

pub use ports::{
    CoverRasterizerPort, CoverRepositoryPort, ImageLoadError, ImageLoaderPort, RepositoryError,
    StoryRepositoryPort, SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError,
};

pub use queries::{
    handlers::{
        BookPageResponse, BookPaginationResponse, CoverImageResponse, CoverRenderSettings,
        CoverRenderer, GetBookPageHandler, GetBookPaginationHandler, GetBookProgressHandler,
        ListTtsProvidersHandler, PreviewCoverHandler, RenderCoverHandler, StorySummary,
        TtsProvidersResponse,
    },
    GetBookPage, GetBookPagination, GetBookProgress, ListTtsProviders, PreviewCover, RenderCover,
};

pub use render_supervisor::{RenderSupervisor, RenderTicket};
pub use tts_registry::TtsProviderRegistry;
