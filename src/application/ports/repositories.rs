//! Repository Ports - 出站端口
//!
//! 定义数据读取的抽象接口
//! 故事、媒体与封面数据由外部应用写入，本服务只读
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::{ProfileId, Story, StoryId, StoryWithMedia};
use crate::domain::cover::CoverConfiguration;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Story Repository
// ============================================================================

/// Story Repository Port
#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    /// 获取用户的全部故事及其媒体
    ///
    /// 按 `created_at` 升序（成书顺序），媒体同样按 `created_at` 升序
    async fn find_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<StoryWithMedia>, RepositoryError>;

    /// 根据 ID 查找故事（不含媒体）
    async fn find_by_id(&self, id: StoryId) -> Result<Option<Story>, RepositoryError>;
}

// ============================================================================
// Cover Repository
// ============================================================================

/// Cover Repository Port
#[async_trait]
pub trait CoverRepositoryPort: Send + Sync {
    /// 读取用户保存的封面配置，未保存时返回 None
    async fn find_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Option<CoverConfiguration>, RepositoryError>;
}
