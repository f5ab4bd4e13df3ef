//! 故事正文切页
//!
//! 按段落（`\n` 分隔）贪心装入与计数相同的字符预算：
//! 1. 段落能放进当前页剩余空间时直接放入
//! 2. 放不下但能完整放进新页时换页
//! 3. 单段超过一整页时，先填满当前页剩余空间，再按字符边界硬切

use super::{PageEstimator, PaginationConfig, Story};

/// 拆分正文段落（去除首尾空白，丢弃空段落）
pub fn split_paragraphs(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// 在第 `n` 个字符处切分
fn split_at_char(text: &str, n: usize) -> (&str, &str) {
    match text.char_indices().nth(n) {
        Some((byte_index, _)) => text.split_at(byte_index),
        None => (text, ""),
    }
}

/// 将正文装入页面，返回每页的段落列表（至少一页）
pub fn pack_paragraphs(content: &str, config: &PaginationConfig) -> Vec<Vec<String>> {
    let mut pages: Vec<Vec<String>> = vec![Vec::new()];
    let mut used = 0usize;

    for paragraph in split_paragraphs(content) {
        let mut rest = paragraph;

        while !rest.is_empty() {
            let budget = config.budget_for_page(pages.len()).max(1);
            let room = budget.saturating_sub(used);
            let len = rest.chars().count();

            if len <= room {
                if let Some(page) = pages.last_mut() {
                    page.push(rest.to_string());
                }
                used += len;
                break;
            }

            let page_is_empty = pages.last().map_or(true, Vec::is_empty);
            if !page_is_empty && (len <= config.page_budget() || room == 0) {
                pages.push(Vec::new());
                used = 0;
                continue;
            }

            let (head, tail) = split_at_char(rest, room);
            if let Some(page) = pages.last_mut() {
                page.push(head.to_string());
            }
            pages.push(Vec::new());
            used = 0;
            rest = tail;
        }
    }

    // 末尾硬切可能留下空页
    if pages.len() > 1 && pages.last().map_or(false, Vec::is_empty) {
        pages.pop();
    }

    pages
}

impl PageEstimator {
    /// 故事第 `page_in_story` 页（1 起）的段落
    ///
    /// 段落装箱可能比字符估算多出页数，多出的内容并入最后一个计数页，
    /// 超出计数范围的页返回空列表
    pub fn page_content(&self, story: &Story, page_in_story: usize) -> Vec<String> {
        let text_pages = self.text_page_count(story.char_count());
        if page_in_story == 0 || page_in_story > text_pages {
            return Vec::new();
        }

        let mut pages = pack_paragraphs(story.content(), self.config());
        if pages.len() > text_pages {
            let overflow: Vec<String> = pages.drain(text_pages..).flatten().collect();
            if let Some(last) = pages.last_mut() {
                last.extend(overflow);
            }
        }

        pages.into_iter().nth(page_in_story - 1).unwrap_or_default()
    }
}
