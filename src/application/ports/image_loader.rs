//! Image Loader Port - 背景图加载抽象
//!
//! URL → 解码后的图片；加载失败由调用方按“无背景图”处理

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

/// 图片加载错误
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Invalid image url: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Image too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Image dimensions exceed limits: {0}")]
    DimensionsExceeded(String),

    #[error("Decode error: {0}")]
    DecodeError(String),
}

/// Image Loader Port
#[async_trait]
pub trait ImageLoaderPort: Send + Sync {
    /// 下载并解码图片
    async fn load(&self, url: &str) -> Result<DynamicImage, ImageLoadError>;
}
