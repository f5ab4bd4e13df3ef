//! 封面字号与换行
//!
//! 字号 = floor(floor(逻辑宽度 × 基础比例) × 用户偏好倍数 × 缩放倍数)
//! 换行 = 贪心按词累积，候选行宽度严格小于最大宽度时继续追加

use super::{CoverConfiguration, CoverDimensions};

/// 标题基础字号占逻辑宽度的比例
pub const TITLE_BASE_RATIO: f64 = 0.08;

/// 作者基础字号占逻辑宽度的比例
pub const AUTHOR_BASE_RATIO: f64 = 0.045;

/// 行高倍数
pub const LINE_HEIGHT: f32 = 1.2;

/// 换行宽度占画布宽度的比例
pub const WRAP_WIDTH_RATIO: f32 = 0.8;

/// 字体角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFace {
    /// 标题（粗体）
    Title,
    /// 作者（常规）
    Author,
}

/// 用户字号偏好到倍数的线性映射
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min_value: f32,
    pub max_value: f32,
    pub min_multiplier: f32,
    pub max_multiplier: f32,
}

pub const TITLE_SIZE_RANGE: SizeRange = SizeRange {
    min_value: 18.0,
    max_value: 24.0,
    min_multiplier: 0.85,
    max_multiplier: 1.15,
};

pub const AUTHOR_SIZE_RANGE: SizeRange = SizeRange {
    min_value: 12.0,
    max_value: 16.0,
    min_multiplier: 0.9,
    max_multiplier: 1.1,
};

impl SizeRange {
    /// 未设置偏好时倍数为 1.0；范围外的值先截断到范围内
    pub fn multiplier(&self, value: Option<f32>) -> f32 {
        match value {
            Some(v) if v.is_finite() => {
                let v = v.clamp(self.min_value, self.max_value);
                let t = (v - self.min_value) / (self.max_value - self.min_value);
                self.min_multiplier + t * (self.max_multiplier - self.min_multiplier)
            }
            _ => 1.0,
        }
    }
}

/// 吸收浮点误差，避免整数结果被截断为前一个整数
const FLOOR_EPSILON: f64 = 1e-6;

fn font_px(base_ratio: f64, multiplier: f32, dims: &CoverDimensions) -> f32 {
    let base = (dims.width() as f64 * base_ratio + FLOOR_EPSILON).floor();
    let px = (base * multiplier as f64 * dims.scale() as f64 + FLOOR_EPSILON).floor();
    px.max(1.0) as f32
}

/// 标题最终字号（像素）
pub fn title_font_px(config: &CoverConfiguration, dims: &CoverDimensions) -> f32 {
    font_px(TITLE_BASE_RATIO, TITLE_SIZE_RANGE.multiplier(config.title_size), dims)
}

/// 作者最终字号（像素）
pub fn author_font_px(config: &CoverConfiguration, dims: &CoverDimensions) -> f32 {
    font_px(AUTHOR_BASE_RATIO, AUTHOR_SIZE_RANGE.multiplier(config.author_size), dims)
}

/// 文本测量
///
/// 由具体字体实现；测量失败属于环境错误，不在此处处理
pub trait TextMeasurer: Send + Sync {
    /// 文本在 `px` 字号下的渲染宽度
    fn text_width(&self, face: TypeFace, text: &str, px: f32) -> f32;

    /// 基线到字形顶部的距离
    fn ascent(&self, face: TypeFace, px: f32) -> f32 {
        let _ = face;
        px * 0.8
    }
}

/// 贪心换行
///
/// 单个超宽单词独占一行（不在词内断开）
pub fn wrap_text(
    measurer: &dyn TextMeasurer,
    face: TypeFace,
    text: &str,
    px: f32,
    max_width: f32,
) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if measurer.text_width(face, &candidate, px) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    lines.push(current);
    lines
}

/// 等宽测量（每字符 `advance × px`）
#[cfg(test)]
pub(crate) struct FixedAdvanceMeasurer {
    pub advance: f32,
}

#[cfg(test)]
impl TextMeasurer for FixedAdvanceMeasurer {
    fn text_width(&self, _face: TypeFace, text: &str, px: f32) -> f32 {
        text.chars().count() as f32 * self.advance * px
    }
}
