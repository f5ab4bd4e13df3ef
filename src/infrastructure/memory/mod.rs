//! In-Memory Implementations
//!
//! 基于 DashMap 的仓储实现，用于测试与无数据库运行

mod cover_repo;
mod story_repo;

pub use cover_repo::InMemoryCoverRepository;
pub use story_repo::InMemoryStoryRepository;
