//! Cover Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("无效的封面尺寸: {0}")]
    InvalidDimensions(String),

    #[error("无效的颜色: {0}")]
    InvalidColor(String),
}
