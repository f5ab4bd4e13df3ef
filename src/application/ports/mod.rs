//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod cover_rasterizer;
mod image_loader;
mod repositories;
mod tts_engine;

pub use cover_rasterizer::CoverRasterizerPort;
pub use image_loader::{ImageLoadError, ImageLoaderPort};
pub use repositories::{CoverRepositoryPort, RepositoryError, StoryRepositoryPort};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
