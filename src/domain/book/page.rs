//! 书页解析 - 全局页号到页面内容

use super::{PageEstimator, PaginationResult, StoryMediaItem, StoryWithMedia};

/// 解析后的书页
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookPage {
    /// 第 0 页
    Cover,
    /// 正文页
    Text {
        story_index: usize,
        page_within_story: usize,
        /// 故事首页显示标题与日期
        is_first_page: bool,
        paragraphs: Vec<String>,
    },
    /// 媒体页（位于故事正文之后）
    Media {
        story_index: usize,
        page_within_story: usize,
        items: Vec<StoryMediaItem>,
    },
}

impl BookPage {
    pub fn story_index(&self) -> Option<usize> {
        match self {
            BookPage::Cover => None,
            BookPage::Text { story_index, .. } | BookPage::Media { story_index, .. } => {
                Some(*story_index)
            }
        }
    }
}

/// 将故事的媒体均分到媒体页，返回第 `media_page`（1 起）页的附件
fn media_for_page(media: &[StoryMediaItem], media_pages: usize, media_page: usize) -> &[StoryMediaItem] {
    if media.is_empty() || media_pages == 0 || media_page == 0 {
        return &[];
    }
    let per_page = media.len().div_ceil(media_pages);
    let start = ((media_page - 1) * per_page).min(media.len());
    let end = (start + per_page).min(media.len());
    &media[start..end]
}

impl PageEstimator {
    /// 解析全局页 `page`
    ///
    /// `pagination` 必须由同一估算器对同一 `stories` 计算得出；越界返回 None
    pub fn resolve_page(
        &self,
        stories: &[StoryWithMedia],
        pagination: &PaginationResult,
        page: usize,
    ) -> Option<BookPage> {
        if page == 0 {
            return Some(BookPage::Cover);
        }

        let owner = pagination.owner_of(page)?;
        let span = pagination.span(owner.story_index)?;
        let entry = stories.get(owner.story_index)?;

        if owner.page_within_story <= span.text_pages {
            return Some(BookPage::Text {
                story_index: owner.story_index,
                page_within_story: owner.page_within_story,
                is_first_page: owner.page_within_story == 1,
                paragraphs: self.page_content(&entry.story, owner.page_within_story),
            });
        }

        let media_page = owner.page_within_story - span.text_pages;
        Some(BookPage::Media {
            story_index: owner.story_index,
            page_within_story: owner.page_within_story,
            items: media_for_page(&entry.media, span.media_pages, media_page).to_vec(),
        })
    }
}
