//! 成书进度

use serde::Serialize;

/// 可印刷成书的最少页数
pub const DEFAULT_MINIMUM_PAGES: usize = 32;

/// 成书进度快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BookProgress {
    /// 当前页数（无故事时为 1，仅封面）
    pub page_count: usize,
    /// 故事数量
    pub story_count: usize,
    /// 最少页数
    pub minimum_pages: usize,
    /// 进度百分比（0-100）
    pub percentage: f64,
}

impl BookProgress {
    pub fn new(page_count: usize, story_count: usize, minimum_pages: usize) -> Self {
        let page_count = page_count.max(1);
        let percentage = if minimum_pages == 0 {
            100.0
        } else {
            (page_count as f64 / minimum_pages as f64 * 100.0).min(100.0)
        };

        Self {
            page_count,
            story_count,
            minimum_pages,
            percentage,
        }
    }

    /// 是否已达到最少页数
    pub fn is_printable(&self) -> bool {
        self.page_count >= self.minimum_pages
    }
}
