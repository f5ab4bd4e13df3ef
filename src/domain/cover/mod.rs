//! Cover Context - 封面限界上下文
//!
//! 职责:
//! - 封面配置解析（颜色、字号偏好、排版方式）
//! - 字号计算与文本换行
//! - 排版规划（与具体字体和位图实现无关）

mod configuration;
mod errors;
mod layout;
mod typography;
mod value_objects;

pub use configuration::{CoverConfiguration, CoverLayout};
pub use errors::CoverError;
pub use layout::{
    cover_crop, plan_cover, CoverPlan, SourceCrop, TextBlock, TextLine,
    AUTHOR_OFFSET_IN_TITLE_HEIGHTS,
};
pub use typography::{
    author_font_px, title_font_px, wrap_text, SizeRange, TextMeasurer, TypeFace,
    AUTHOR_SIZE_RANGE, LINE_HEIGHT, TITLE_SIZE_RANGE, WRAP_WIDTH_RATIO,
};
pub use value_objects::{
    CoverColor, CoverDimensions, DEFAULT_COVER_HEIGHT, DEFAULT_COVER_WIDTH, DEFAULT_TEXT_COLOR,
};

#[cfg(test)]
pub(crate) use typography::FixedAdvanceMeasurer;
