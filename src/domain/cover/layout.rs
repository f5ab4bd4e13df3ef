//! 封面排版规划
//!
//! 纯计算：给定配置、尺寸与文本测量器，得到各图层的位置。
//! 绘制顺序固定为 背景 → 标题 → 作者。

use super::typography::{
    author_font_px, title_font_px, wrap_text, TextMeasurer, TypeFace, LINE_HEIGHT,
    WRAP_WIDTH_RATIO,
};
use super::{CoverColor, CoverConfiguration, CoverDimensions};

/// 有标题时作者相对锚点的下移量（以标题字号为单位）
pub const AUTHOR_OFFSET_IN_TITLE_HEIGHTS: f32 = 1.5;

/// 单行文本
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// 测量宽度
    pub width: f32,
    /// 水平中心
    pub center_x: f32,
    /// 基线纵坐标
    pub baseline_y: f32,
}

impl TextLine {
    pub fn left_x(&self) -> f32 {
        self.center_x - self.width / 2.0
    }
}

/// 一段居中排列的多行文本
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub face: TypeFace,
    pub font_px: f32,
    pub color: CoverColor,
    /// 基线到字形顶部的距离，用于换算绘制时的顶部坐标
    pub ascent: f32,
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    pub fn first_baseline(&self) -> Option<f32> {
        self.lines.first().map(|l| l.baseline_y)
    }
}

/// 背景图中可见的源区域（像素，位于原图范围内）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 等比铺满画布并居中裁剪时，原图中实际可见的区域
///
/// 图片比画布更宽时按高度适配、裁左右；否则按宽度适配、裁上下。
/// 只需把该区域缩放到画布尺寸，缩放缓冲区不会超过画布
pub fn cover_crop(image_width: u32, image_height: u32, frame_width: u32, frame_height: u32) -> SourceCrop {
    let full = SourceCrop {
        x: 0,
        y: 0,
        width: image_width,
        height: image_height,
    };
    if image_width == 0 || image_height == 0 || frame_width == 0 || frame_height == 0 {
        return full;
    }

    let frame_ratio = frame_width as f64 / frame_height as f64;
    let image_ratio = image_width as f64 / image_height as f64;

    if image_ratio > frame_ratio {
        let width = ((image_height as f64 * frame_ratio).round() as u32).clamp(1, image_width);
        SourceCrop {
            x: (image_width - width) / 2,
            width,
            ..full
        }
    } else {
        let height = ((image_width as f64 / frame_ratio).round() as u32).clamp(1, image_height);
        SourceCrop {
            y: (image_height - height) / 2,
            height,
            ..full
        }
    }
}

/// 封面渲染计划
#[derive(Debug, Clone, PartialEq)]
pub struct CoverPlan {
    /// 画布像素宽度
    pub width: u32,
    /// 画布像素高度
    pub height: u32,
    /// 纯色背景，None 表示透明
    pub background_color: Option<CoverColor>,
    pub title: Option<TextBlock>,
    pub author: Option<TextBlock>,
}

fn layout_block(
    measurer: &dyn TextMeasurer,
    face: TypeFace,
    text: &str,
    px: f32,
    color: CoverColor,
    canvas_width: f32,
    first_baseline: f32,
) -> TextBlock {
    let center_x = canvas_width / 2.0;
    let lines = wrap_text(measurer, face, text, px, canvas_width * WRAP_WIDTH_RATIO)
        .into_iter()
        .enumerate()
        .map(|(index, line)| TextLine {
            width: measurer.text_width(face, &line, px),
            text: line,
            center_x,
            baseline_y: first_baseline + index as f32 * px * LINE_HEIGHT,
        })
        .collect();

    TextBlock {
        face,
        font_px: px,
        color,
        ascent: measurer.ascent(face, px),
        lines,
    }
}

/// 计算封面各图层位置
pub fn plan_cover(
    config: &CoverConfiguration,
    dims: &CoverDimensions,
    measurer: &dyn TextMeasurer,
) -> CoverPlan {
    let width = dims.pixel_width();
    let height = dims.pixel_height();
    let canvas_w = width as f32;
    let canvas_h = height as f32;

    let title_px = title_font_px(config, dims);
    let title = config.title().map(|text| {
        layout_block(
            measurer,
            TypeFace::Title,
            text,
            title_px,
            config.title_color(),
            canvas_w,
            canvas_h * config.layout.title_anchor(),
        )
    });

    let author = config.author().map(|text| {
        let offset = if title.is_some() {
            title_px * AUTHOR_OFFSET_IN_TITLE_HEIGHTS
        } else {
            0.0
        };
        layout_block(
            measurer,
            TypeFace::Author,
            text,
            author_font_px(config, dims),
            config.author_color(),
            canvas_w,
            canvas_h * config.layout.author_anchor() + offset,
        )
    });

    CoverPlan {
        width,
        height,
        background_color: config.background(),
        title,
        author,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cover::typography::FixedAdvanceMeasurer;
    use crate::domain::cover::CoverLayout;

    fn config(layout: CoverLayout) -> CoverConfiguration {
        CoverConfiguration {
            title_text: Some("Stories From Grandma's Kitchen".to_string()),
            author_text: Some("Rosa Martínez".to_string()),
            layout,
            ..CoverConfiguration::default()
        }
    }

    fn title_y(layout: CoverLayout) -> f32 {
        let measurer = FixedAdvanceMeasurer { advance: 0.5 };
        plan_cover(&config(layout), &CoverDimensions::default(), &measurer)
            .title
            .and_then(|t| t.first_baseline())
            .unwrap()
    }

    #[test]
    fn test_layout_ordering() {
        let top = title_y(CoverLayout::Top);
        let centered = title_y(CoverLayout::Centered);
        let bottom = title_y(CoverLayout::Bottom);
        assert!(top < centered);
        assert!(centered < bottom);
        assert!((top - 120.0).abs() < 1e-3);
        assert!((centered - 270.0).abs() < 1e-3);
        assert!((bottom - 390.0).abs() < 1e-3);
    }

    #[test]
    fn test_author_offset_uses_title_height() {
        let measurer = FixedAdvanceMeasurer { advance: 0.5 };
        let plan = plan_cover(&config(CoverLayout::Centered), &CoverDimensions::default(), &measurer);
        let author = plan.author.unwrap();
        // 600 × 0.55 + 32 × 1.5
        assert!((author.first_baseline().unwrap() - 378.0).abs() < 1e-3);
        assert_eq!(author.font_px, 18.0);

        let without_title = CoverConfiguration {
            title_text: None,
            ..config(CoverLayout::Centered)
        };
        let plan = plan_cover(&without_title, &CoverDimensions::default(), &measurer);
        assert!(plan.title.is_none());
        assert!((plan.author.unwrap().first_baseline().unwrap() - 330.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrapped_lines_are_centered_and_stacked() {
        let measurer = FixedAdvanceMeasurer { advance: 0.6 };
        let plan = plan_cover(&config(CoverLayout::Top), &CoverDimensions::default(), &measurer);
        let title = plan.title.unwrap();
        assert!(title.lines.len() > 1);

        for (i, line) in title.lines.iter().enumerate() {
            assert_eq!(line.center_x, 200.0);
            assert!((line.baseline_y - (120.0 + i as f32 * 32.0 * 1.2)).abs() < 1e-3);
            if line.text.contains(' ') {
                assert!(line.width < 400.0 * 0.8);
            }
        }
    }

    #[test]
    fn test_scaled_plan_uses_pixel_canvas() {
        let measurer = FixedAdvanceMeasurer { advance: 0.5 };
        let dims = CoverDimensions::new(400.0, 600.0, 2.0).unwrap();
        let plan = plan_cover(&config(CoverLayout::Top), &dims, &measurer);
        assert_eq!((plan.width, plan.height), (800, 1200));
        let title = plan.title.unwrap();
        assert_eq!(title.font_px, 64.0);
        assert!((title.first_baseline().unwrap() - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_cover_crop_wide_image_trims_sides() {
        let crop = cover_crop(1600, 600, 400, 600);
        assert_eq!(crop, SourceCrop { x: 600, y: 0, width: 400, height: 600 });
    }

    #[test]
    fn test_cover_crop_tall_image_trims_top_and_bottom() {
        let crop = cover_crop(400, 1200, 400, 600);
        assert_eq!(crop, SourceCrop { x: 0, y: 300, width: 400, height: 600 });
    }

    #[test]
    fn test_cover_crop_extreme_aspect_stays_inside_source() {
        let crop = cover_crop(100_000, 1, 400, 600);
        assert_eq!((crop.width, crop.height), (1, 1));
        assert_eq!(crop.x, 49_999);

        let crop = cover_crop(1, 100_000, 400, 600);
        assert_eq!((crop.width, crop.height), (1, 2));
        assert!(crop.y + crop.height <= 100_000);
    }

    #[test]
    fn test_cover_crop_matching_ratio_is_whole_image() {
        assert_eq!(
            cover_crop(800, 1200, 400, 600),
            SourceCrop { x: 0, y: 0, width: 800, height: 1200 }
        );
    }

    #[test]
    fn test_background_color_and_transparent_default() {
        let measurer = FixedAdvanceMeasurer { advance: 0.5 };
        let mut cfg = config(CoverLayout::Centered);
        assert!(plan_cover(&cfg, &CoverDimensions::default(), &measurer)
            .background_color
            .is_none());

        cfg.background_color = Some("#A33D29".to_string());
        assert_eq!(
            plan_cover(&cfg, &CoverDimensions::default(), &measurer).background_color,
            Some(CoverColor::rgb(0xa3, 0x3d, 0x29))
        );
    }
}
