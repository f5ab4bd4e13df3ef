//! 位图合成：背景色 → 背景图 → 标题 → 作者

use ab_glyph::PxScale;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use super::GlyphTextMeasurer;
use crate::application::ports::CoverRasterizerPort;
use crate::domain::cover::{cover_crop, CoverColor, CoverPlan, TextBlock, TextMeasurer};

fn rgba(color: CoverColor) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// 绘制背景层
///
/// 先铺纯色（未设置时保持透明），再将背景图等比铺满并居中裁剪。
/// 先裁出可见区域再缩放，缩放结果始终等于画布尺寸
pub fn paint_background(
    canvas: &mut RgbaImage,
    color: Option<CoverColor>,
    image: Option<&DynamicImage>,
) {
    if let Some(color) = color {
        let fill = rgba(color);
        for pixel in canvas.pixels_mut() {
            *pixel = fill;
        }
    }

    let Some(image) = image else {
        return;
    };

    let crop = cover_crop(image.width(), image.height(), canvas.width(), canvas.height());
    let visible = image.crop_imm(crop.x, crop.y, crop.width, crop.height);
    let scaled = visible
        .resize_exact(canvas.width(), canvas.height(), FilterType::Triangle)
        .to_rgba8();

    imageops::overlay(canvas, &scaled, 0, 0);
}

/// ab_glyph + imageproc 封面渲染器
pub struct RasterCoverRenderer {
    measurer: GlyphTextMeasurer,
}

impl RasterCoverRenderer {
    pub fn new(measurer: GlyphTextMeasurer) -> Self {
        Self { measurer }
    }

    fn draw_block(&self, canvas: &mut RgbaImage, block: &TextBlock) {
        let font = self.measurer.font(block.face);
        let scale = PxScale::from(block.font_px);
        let color = rgba(block.color);

        for line in &block.lines {
            // draw_text_mut 以字形顶部为 y
            let top = line.baseline_y - block.ascent;
            draw_text_mut(
                canvas,
                color,
                line.left_x().round() as i32,
                top.round() as i32,
                scale,
                font,
                &line.text,
            );
        }
    }
}

impl CoverRasterizerPort for RasterCoverRenderer {
    fn measurer(&self) -> &dyn TextMeasurer {
        &self.measurer
    }

    fn compose(&self, plan: &CoverPlan, background: Option<&DynamicImage>) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(plan.width, plan.height, Rgba([0, 0, 0, 0]));

        paint_background(&mut canvas, plan.background_color, background);

        for block in [&plan.title, &plan.author].into_iter().flatten() {
            self.draw_block(&mut canvas, block);
        }

        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
    }

    #[test]
    fn test_no_background_stays_transparent() {
        let mut canvas = blank(4, 6);
        paint_background(&mut canvas, None, None);
        assert!(canvas.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_color_fill() {
        let mut canvas = blank(4, 6);
        paint_background(&mut canvas, Some(CoverColor::rgb(0xa3, 0x3d, 0x29)), None);
        assert!(canvas.pixels().all(|p| *p == Rgba([0xa3, 0x3d, 0x29, 255])));
    }

    #[test]
    fn test_wide_image_is_center_cropped() {
        // 左半红、右半蓝的 8x2 图片，铺满 2x2 画布：按高度适配，只保留中间两列
        let mut source = RgbaImage::new(8, 2);
        for (x, _, pixel) in source.enumerate_pixels_mut() {
            *pixel = if x < 4 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) };
        }
        let mut canvas = blank(2, 2);
        paint_background(&mut canvas, None, Some(&DynamicImage::ImageRgba8(source)));

        assert!(canvas.pixels().all(|p| p.0[3] == 255));
        let left = canvas.get_pixel(0, 0);
        let right = canvas.get_pixel(1, 0);
        assert!(left.0[0] > left.0[2]);
        assert!(right.0[2] > right.0[0]);
    }

    #[test]
    fn test_image_covers_color() {
        let source = RgbaImage::from_pixel(10, 30, Rgba([0, 200, 0, 255]));
        let mut canvas = blank(4, 6);
        paint_background(
            &mut canvas,
            Some(CoverColor::rgb(255, 255, 255)),
            Some(&DynamicImage::ImageRgba8(source)),
        );
        assert!(canvas
            .pixels()
            .all(|p| p.0[0] <= 1 && p.0[1] >= 199 && p.0[2] <= 1 && p.0[3] == 255));
    }
    #[test]
    fn test_extreme_aspect_background_stays_canvas_sized() {
        let source = RgbaImage::from_pixel(5000, 1, Rgba([30, 60, 90, 255]));
        let mut canvas = blank(400, 600);
        paint_background(&mut canvas, None, Some(&DynamicImage::ImageRgba8(source)));
        assert!(canvas.pixels().all(|p| *p == Rgba([30, 60, 90, 255])));

        let source = RgbaImage::from_pixel(1, 5000, Rgba([90, 60, 30, 255]));
        let mut canvas = blank(400, 600);
        paint_background(&mut canvas, None, Some(&DynamicImage::ImageRgba8(source)));
        assert!(canvas.pixels().all(|p| *p == Rgba([90, 60, 30, 255])));
    }

    mod glyphs {
        use super::*;
        use crate::domain::cover::{plan_cover, CoverConfiguration, CoverDimensions, CoverLayout};
        use ab_glyph::FontArc;

        static DEJAVU_SERIF: &[u8] = include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/fonts/DejaVuSerif.ttf"
        ));

        fn renderer() -> RasterCoverRenderer {
            let font = FontArc::try_from_slice(DEJAVU_SERIF).unwrap();
            RasterCoverRenderer::new(GlyphTextMeasurer::new(font, None))
        }

        fn title_only(title: &str) -> CoverConfiguration {
            CoverConfiguration {
                background_color: Some("#000000".to_string()),
                title_text: Some(title.to_string()),
                title_color: Some("#ffffff".to_string()),
                layout: CoverLayout::Top,
                ..CoverConfiguration::default()
            }
        }

        /// 亮像素的包围盒 (min_x, min_y, max_x, max_y)
        fn ink_bounds(canvas: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
            let mut bounds: Option<(u32, u32, u32, u32)> = None;
            for (x, y, pixel) in canvas.enumerate_pixels() {
                if pixel.0[0] > 128 {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    });
                }
            }
            bounds
        }

        #[test]
        fn test_real_font_wrapping_stays_under_wrap_width() {
            let renderer = renderer();
            let config = title_only("The Long Summer We Spent Building Boats Down By The River");
            let dims = CoverDimensions::default();
            let plan = plan_cover(&config, &dims, renderer.measurer());

            let title = plan.title.unwrap();
            assert!(title.lines.len() > 1);
            for line in &title.lines {
                assert!(line.width > 0.0);
                assert!(line.width < 400.0 * 0.8, "{:?} is {}px wide", line.text, line.width);
            }
        }

        #[test]
        fn test_title_ink_sits_on_planned_baseline() {
            let renderer = renderer();
            let config = title_only("HHHH");
            let dims = CoverDimensions::default();
            let plan = plan_cover(&config, &dims, renderer.measurer());

            let title = plan.title.clone().unwrap();
            let line = &title.lines[0];
            assert!((line.baseline_y - 120.0).abs() < 1e-3);

            let canvas = renderer.compose(&plan, None);
            let (min_x, min_y, max_x, max_y) = ink_bounds(&canvas).unwrap();

            // H 无下伸部，墨迹底部贴着基线
            assert!((max_y as f32 - line.baseline_y).abs() <= 2.0, "bottom row {}", max_y);
            assert!(min_y as f32 >= line.baseline_y - title.ascent - 1.0);
            assert!((min_y as f32) < line.baseline_y - title.font_px * 0.5);

            let center = (min_x + max_x) as f32 / 2.0;
            assert!((center - line.center_x).abs() <= 4.0, "ink center {}", center);
        }

        #[test]
        fn test_huge_size_preference_renders_at_clamped_size() {
            let renderer = renderer();
            let config = CoverConfiguration {
                title_size: Some(1e38),
                ..title_only("Big")
            };
            let plan = plan_cover(&config, &CoverDimensions::default(), renderer.measurer());
            assert_eq!(plan.title.as_ref().unwrap().font_px, 36.0);

            let canvas = renderer.compose(&plan, None);
            let (_, _, _, max_y) = ink_bounds(&canvas).unwrap();
            assert!(max_y < 600);
        }
    }
}
