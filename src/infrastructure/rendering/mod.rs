//! Rendering - 封面位图合成
//!
//! ab_glyph 负责字体度量，imageproc 负责字形绘制

mod font;
mod raster;

pub use font::{FontLoadError, GlyphTextMeasurer};
pub use raster::{paint_background, RasterCoverRenderer};
