//! Cover Rasterizer Port - 封面位图合成抽象
//!
//! 合成是同步的纯 CPU 操作；背景图需先经 ImageLoaderPort 异步加载

use image::{DynamicImage, RgbaImage};

use crate::domain::cover::{CoverPlan, TextMeasurer};

/// Cover Rasterizer Port
pub trait CoverRasterizerPort: Send + Sync {
    /// 排版规划所用的文本测量器（与绘制使用同一套字体）
    fn measurer(&self) -> &dyn TextMeasurer;

    /// 按 背景色 → 背景图 → 标题 → 作者 的顺序绘制
    fn compose(&self, plan: &CoverPlan, background: Option<&DynamicImage>) -> RgbaImage;
}
