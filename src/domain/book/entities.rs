//! Book Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MediaId, MediaKind, ProfileId, StoryId};

/// 故事 - 分页的基本单位
///
/// 不变量:
/// - 对分页而言内容不可变，内容长度（Unicode 字符数）决定页数
/// - 段落以 `\n` 分隔
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    id: StoryId,
    owner_id: ProfileId,
    title: Option<String>,
    content: String,
    share_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl Story {
    pub fn new(
        id: StoryId,
        owner_id: ProfileId,
        title: Option<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            title: title.filter(|t| !t.trim().is_empty()),
            content: content.into(),
            share_token: None,
            created_at,
        }
    }

    pub fn with_share_token(mut self, token: impl Into<String>) -> Self {
        self.share_token = Some(token.into());
        self
    }

    pub fn id(&self) -> StoryId {
        self.id
    }

    pub fn owner_id(&self) -> ProfileId {
        self.owner_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// 显示用标题，未设置时为 "Untitled Story"
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Story")
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 内容长度（字符数）
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn share_token(&self) -> Option<&str> {
        self.share_token.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 故事附带的媒体（图片 / 视频）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMediaItem {
    id: MediaId,
    story_id: StoryId,
    content_type: String,
    file_path: String,
    caption: Option<String>,
    created_at: DateTime<Utc>,
}

impl StoryMediaItem {
    pub fn new(
        id: MediaId,
        story_id: StoryId,
        content_type: impl Into<String>,
        file_path: impl Into<String>,
        caption: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            story_id,
            content_type: content_type.into(),
            file_path: file_path.into(),
            caption,
            created_at,
        }
    }

    pub fn id(&self) -> MediaId {
        self.id
    }

    pub fn story_id(&self) -> StoryId {
        self.story_id
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type)
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 故事及其媒体，分页器的输入单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryWithMedia {
    pub story: Story,
    pub media: Vec<StoryMediaItem>,
}

impl StoryWithMedia {
    pub fn new(story: Story, media: Vec<StoryMediaItem>) -> Self {
        Self { story, media }
    }

    pub fn without_media(story: Story) -> Self {
        Self {
            story,
            media: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_is_untitled() {
        let story = Story::new(
            StoryId::new(),
            ProfileId::new(),
            Some("   ".to_string()),
            "content",
            Utc::now(),
        );
        assert_eq!(story.title(), None);
        assert_eq!(story.display_title(), "Untitled Story");
    }

    #[test]
    fn test_char_count_counts_characters_not_bytes() {
        let story = Story::new(StoryId::new(), ProfileId::new(), None, "héllo 故事", Utc::now());
        assert_eq!(story.char_count(), 8);
    }
}
