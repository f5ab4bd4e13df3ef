//! 字体加载与文本测量

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::cover::{TextMeasurer, TypeFace};

/// 字体加载错误
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font file: {0}")]
    Invalid(PathBuf),
}

fn load_font(path: &Path) -> Result<FontArc, FontLoadError> {
    let bytes = std::fs::read(path).map_err(|source| FontLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| FontLoadError::Invalid(path.to_path_buf()))
}

/// 基于 ab_glyph 的文本测量器
///
/// 标题可使用单独的粗体字体，未配置时与正文共用
#[derive(Clone)]
pub struct GlyphTextMeasurer {
    regular: FontArc,
    title: Option<FontArc>,
}

impl GlyphTextMeasurer {
    pub fn new(regular: FontArc, title: Option<FontArc>) -> Self {
        Self { regular, title }
    }

    /// 从字体文件加载
    pub fn load(regular: &Path, title: Option<&Path>) -> Result<Self, FontLoadError> {
        let regular_font = load_font(regular)?;
        let title_font = title.map(load_font).transpose()?;

        tracing::info!(
            regular = %regular.display(),
            title = ?title.map(|p| p.display().to_string()),
            "Cover fonts loaded"
        );
        Ok(Self::new(regular_font, title_font))
    }

    /// 指定角色使用的字体
    pub fn font(&self, face: TypeFace) -> &FontArc {
        match face {
            TypeFace::Title => self.title.as_ref().unwrap_or(&self.regular),
            TypeFace::Author => &self.regular,
        }
    }
}

impl TextMeasurer for GlyphTextMeasurer {
    fn text_width(&self, face: TypeFace, text: &str, px: f32) -> f32 {
        let font = self.font(face).as_scaled(PxScale::from(px));

        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            let glyph = font.glyph_id(ch);
            if let Some(prev) = previous {
                width += font.kern(prev, glyph);
            }
            width += font.h_advance(glyph);
            previous = Some(glyph);
        }
        width
    }

    fn ascent(&self, face: TypeFace, px: f32) -> f32 {
        self.font(face).as_scaled(PxScale::from(px)).ascent()
    }
}
