//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - 故事与媒体附件实体
//! - 页数估算与页归属查询
//! - 正文切页与书页解析
//! - 成书进度

mod entities;
mod page;
mod pagination;
mod progress;
mod slicing;
mod value_objects;

pub use entities::{Story, StoryMediaItem, StoryWithMedia};
pub use page::BookPage;
pub use pagination::{
    MediaPagePolicy, PageEstimator, PageOwner, PaginationConfig, PaginationResult, StorySpan,
    DEFAULT_CHARS_PER_PAGE, DEFAULT_FIRST_PAGE_RESERVED, DEFAULT_PAGES_PER_MEDIA_ITEM,
};
pub use progress::{BookProgress, DEFAULT_MINIMUM_PAGES};
pub use slicing::{pack_paragraphs, split_paragraphs};
pub use value_objects::{MediaId, MediaKind, ProfileId, StoryId};
