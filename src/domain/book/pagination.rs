//! 书籍分页估算
//!
//! 以固定的每页字符预算模拟纸质书排版：
//! - 第 0 页固定为封面
//! - 每个故事从新的一页开始，首页预留标题/日期区域
//! - 媒体附件按 [`MediaPagePolicy`] 追加页数（向上取整）

use serde::Serialize;

use super::StoryWithMedia;

/// 默认每页字符数
pub const DEFAULT_CHARS_PER_PAGE: usize = 1500;

/// 默认故事首页预留字符数（标题与日期）
pub const DEFAULT_FIRST_PAGE_RESERVED: usize = 150;

/// 默认每个媒体附件占用的页数
pub const DEFAULT_PAGES_PER_MEDIA_ITEM: f64 = 1.0;

/// 媒体附件的页数计算策略
///
/// 同一次分页中策略对计数、归属查询和页面解析一致生效
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaPagePolicy {
    /// 媒体不占页
    Ignore,
    /// 每个故事固定追加半页，向上取整后即一页（承载该故事的全部媒体）
    Flat,
    /// 每个附件占 `pages_per_item` 页，合计向上取整
    PerItem { pages_per_item: f64 },
}

impl MediaPagePolicy {
    /// 从配置名称解析（`ignore` / `flat` / `per_item`）
    pub fn from_name(name: &str, pages_per_item: f64) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ignore" | "none" => Some(MediaPagePolicy::Ignore),
            "flat" => Some(MediaPagePolicy::Flat),
            "per_item" | "per-item" => Some(MediaPagePolicy::PerItem { pages_per_item }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaPagePolicy::Ignore => "ignore",
            MediaPagePolicy::Flat => "flat",
            MediaPagePolicy::PerItem { .. } => "per_item",
        }
    }

    /// 计算媒体追加的整页数
    pub fn media_pages(&self, text_pages: usize, media_count: usize) -> usize {
        match *self {
            MediaPagePolicy::Ignore => 0,
            MediaPagePolicy::Flat => {
                let with_media = (text_pages as f64 + 0.5).ceil() as usize;
                with_media.saturating_sub(text_pages)
            }
            MediaPagePolicy::PerItem { pages_per_item } => {
                if media_count == 0 || !(pages_per_item > 0.0) {
                    return 0;
                }
                (media_count as f64 * pages_per_item).ceil() as usize
            }
        }
    }
}

impl Default for MediaPagePolicy {
    fn default() -> Self {
        MediaPagePolicy::PerItem {
            pages_per_item: DEFAULT_PAGES_PER_MEDIA_ITEM,
        }
    }
}

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationConfig {
    /// 每页字符预算
    pub chars_per_page: usize,
    /// 故事首页预留字符数
    pub first_page_reserved: usize,
    /// 媒体页策略
    pub media_policy: MediaPagePolicy,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            chars_per_page: DEFAULT_CHARS_PER_PAGE,
            first_page_reserved: DEFAULT_FIRST_PAGE_RESERVED,
            media_policy: MediaPagePolicy::default(),
        }
    }
}

impl PaginationConfig {
    /// 每页预算（至少为 1）
    pub fn page_budget(&self) -> usize {
        self.chars_per_page.max(1)
    }

    /// 故事首页可容纳的正文字符数
    pub fn first_page_capacity(&self) -> usize {
        self.chars_per_page.saturating_sub(self.first_page_reserved)
    }

    /// 故事第 `page_in_story` 页（1 起）的字符预算
    pub fn budget_for_page(&self, page_in_story: usize) -> usize {
        if page_in_story <= 1 {
            self.first_page_capacity()
        } else {
            self.page_budget()
        }
    }
}

/// 单个故事在书中占用的页区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorySpan {
    /// 起始全局页号（封面为 0）
    pub start: usize,
    /// 正文页数（至少 1）
    pub text_pages: usize,
    /// 媒体页数
    pub media_pages: usize,
}

impl StorySpan {
    pub fn page_count(&self) -> usize {
        self.text_pages + self.media_pages
    }

    /// 区间结束页（不包含）
    pub fn end(&self) -> usize {
        self.start + self.page_count()
    }
}

/// 页归属：哪个故事的第几页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageOwner {
    /// 故事在输入序列中的索引
    pub story_index: usize,
    /// 故事内页号（1 起）
    pub page_within_story: usize,
}

/// 分页结果
///
/// 不变量:
/// - `total_page_count >= 1`（至少有封面）
/// - `story_start_indices` 严格递增，首个为 1
/// - 最后一个故事的区间结束页等于 `total_page_count`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationResult {
    pub total_page_count: usize,
    pub story_start_indices: Vec<usize>,
    pub spans: Vec<StorySpan>,
}

impl PaginationResult {
    /// 只有封面的空书
    pub fn cover_only() -> Self {
        Self {
            total_page_count: 1,
            story_start_indices: Vec::new(),
            spans: Vec::new(),
        }
    }

    pub fn story_count(&self) -> usize {
        self.spans.len()
    }

    pub fn span(&self, story_index: usize) -> Option<&StorySpan> {
        self.spans.get(story_index)
    }

    /// 查找全局页 `page` 的所属故事
    ///
    /// 封面（第 0 页）和越界页没有归属
    pub fn owner_of(&self, page: usize) -> Option<PageOwner> {
        if page == 0 || page >= self.total_page_count {
            return None;
        }

        // 最后一个起始页 <= page 的故事
        let after = self.story_start_indices.partition_point(|&start| start <= page);
        let story_index = after.checked_sub(1)?;
        let start = self.story_start_indices[story_index];

        Some(PageOwner {
            story_index,
            page_within_story: page - start + 1,
        })
    }
}

/// 页数估算器
#[derive(Debug, Clone, Default)]
pub struct PageEstimator {
    config: PaginationConfig,
}

impl PageEstimator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// 正文所需页数
    ///
    /// `1 + ceil(max(0, len - first_page_capacity) / chars_per_page)`
    pub fn text_page_count(&self, char_count: usize) -> usize {
        let remaining = char_count.saturating_sub(self.config.first_page_capacity());
        1 + remaining.div_ceil(self.config.page_budget())
    }

    /// 计算单个故事的页区间
    pub fn story_span(&self, start: usize, char_count: usize, media_count: usize) -> StorySpan {
        let text_pages = self.text_page_count(char_count);
        let media_pages = self.config.media_policy.media_pages(text_pages, media_count);
        StorySpan {
            start,
            text_pages,
            media_pages,
        }
    }

    /// 按 (字符数, 媒体数) 序列分页
    pub fn paginate_counts<I>(&self, counts: I) -> PaginationResult
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut result = PaginationResult::cover_only();
        let mut next_page = 1;

        for (char_count, media_count) in counts {
            let span = self.story_span(next_page, char_count, media_count);
            result.story_start_indices.push(span.start);
            next_page = span.end();
            result.spans.push(span);
        }

        result.total_page_count = next_page;
        result
    }

    /// 对带媒体的故事序列分页
    pub fn paginate(&self, stories: &[StoryWithMedia]) -> PaginationResult {
        self.paginate_counts(
            stories
                .iter()
                .map(|entry| (entry.story.char_count(), entry.media.len())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_only() -> PageEstimator {
        PageEstimator::new(PaginationConfig {
            chars_per_page: 1500,
            first_page_reserved: 150,
            media_policy: MediaPagePolicy::Ignore,
        })
    }

    #[test]
    fn test_empty_book_is_cover_only() {
        let result = text_only().paginate_counts(Vec::new());
        assert_eq!(result.total_page_count, 1);
        assert!(result.story_start_indices.is_empty());
        assert_eq!(result.owner_of(0), None);
    }

    #[test]
    fn test_single_long_story() {
        let result = text_only().paginate_counts([(3000, 0)]);
        assert_eq!(result.spans[0].text_pages, 3);
        assert_eq!(result.total_page_count, 4);
        assert_eq!(result.story_start_indices, vec![1]);
    }

    #[test]
    fn test_empty_and_short_stories() {
        let result = text_only().paginate_counts([(0, 0), (1600, 0)]);
        assert_eq!(result.spans[0].page_count(), 1);
        assert_eq!(result.spans[1].page_count(), 2);
        assert_eq!(result.total_page_count, 4);
        assert_eq!(result.story_start_indices, vec![1, 2]);
    }

    #[test]
    fn test_exact_first_page_capacity_fits_one_page() {
        let estimator = text_only();
        assert_eq!(estimator.text_page_count(1350), 1);
        assert_eq!(estimator.text_page_count(1351), 2);
        assert_eq!(estimator.text_page_count(1350 + 1500), 2);
        assert_eq!(estimator.text_page_count(1350 + 1501), 3);
    }

    #[test]
    fn test_starts_strictly_increasing_and_consistent() {
        let counts = [(10, 0), (5000, 2), (0, 0), (1400, 1), (20_000, 0)];
        let estimator = PageEstimator::default();
        let result = estimator.paginate_counts(counts);

        assert!(result.total_page_count >= counts.len());
        assert_eq!(result.story_start_indices[0], 1);
        for pair in result.story_start_indices.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(result.spans.last().unwrap().end(), result.total_page_count);
    }

    #[test]
    fn test_pagination_is_idempotent() {
        let estimator = PageEstimator::default();
        let counts = vec![(1234, 1), (99, 0), (7777, 3)];
        assert_eq!(
            estimator.paginate_counts(counts.clone()),
            estimator.paginate_counts(counts)
        );
    }

    #[test]
    fn test_owner_lookup_matches_starts() {
        let result = PageEstimator::default().paginate_counts([(0, 1), (3000, 0), (200, 2)]);

        for page in 1..result.total_page_count {
            let owner = result.owner_of(page).unwrap();
            let start = result.story_start_indices[owner.story_index];
            assert!(start <= page);
            if let Some(next) = result.story_start_indices.get(owner.story_index + 1) {
                assert!(*next > page);
            }
            assert_eq!(owner.page_within_story, page - start + 1);
        }
        assert_eq!(result.owner_of(result.total_page_count), None);
    }

    #[test]
    fn test_per_item_policy_rounds_up() {
        let policy = MediaPagePolicy::PerItem { pages_per_item: 0.5 };
        assert_eq!(policy.media_pages(2, 0), 0);
        assert_eq!(policy.media_pages(2, 1), 1);
        assert_eq!(policy.media_pages(2, 3), 2);
    }

    #[test]
    fn test_flat_policy_adds_one_page_per_story() {
        let estimator = PageEstimator::new(PaginationConfig {
            media_policy: MediaPagePolicy::Flat,
            ..PaginationConfig::default()
        });
        let result = estimator.paginate_counts([(0, 0), (3000, 4)]);
        assert_eq!(result.spans[0].page_count(), 2);
        assert_eq!(result.spans[1].page_count(), 4);
        assert_eq!(result.total_page_count, 7);
    }

    #[test]
    fn test_policy_from_name() {
        assert_eq!(MediaPagePolicy::from_name("flat", 1.0), Some(MediaPagePolicy::Flat));
        assert_eq!(
            MediaPagePolicy::from_name("PER_ITEM", 0.5),
            Some(MediaPagePolicy::PerItem { pages_per_item: 0.5 })
        );
        assert_eq!(MediaPagePolicy::from_name("sometimes", 1.0), None);
    }
}
