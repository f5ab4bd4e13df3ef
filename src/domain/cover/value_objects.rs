//! Cover Context - Value Objects

use serde::{Deserialize, Serialize};

use super::CoverError;

/// 默认文字颜色
pub const DEFAULT_TEXT_COLOR: CoverColor = CoverColor::rgb(0x30, 0x34, 0x41);

/// 默认封面逻辑尺寸（5:8 版式）
pub const DEFAULT_COVER_WIDTH: f32 = 400.0;
pub const DEFAULT_COVER_HEIGHT: f32 = 600.0;

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl CoverColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 解析 `#rgb` / `#rrggbb` / `#rrggbbaa`
    pub fn parse_hex(value: &str) -> Result<Self, CoverError> {
        let invalid = || CoverError::InvalidColor(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    out[i] = v * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 | 8 => {
                let r = channel(&hex[0..2])?;
                let g = channel(&hex[2..4])?;
                let b = channel(&hex[4..6])?;
                let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
                Ok(Self { r, g, b, a })
            }
            _ => Err(invalid()),
        }
    }

    /// 解析失败或缺失时使用默认值
    pub fn parse_or(value: Option<&str>, fallback: CoverColor) -> CoverColor {
        value
            .and_then(|v| Self::parse_hex(v).ok())
            .unwrap_or(fallback)
    }
}

/// 渲染尺寸：逻辑宽高 + 像素缩放倍数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverDimensions {
    width: f32,
    height: f32,
    scale: f32,
}

impl CoverDimensions {
    pub fn new(width: f32, height: f32, scale: f32) -> Result<Self, CoverError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) || !valid(scale) {
            return Err(CoverError::InvalidDimensions(format!(
                "width={}, height={}, scale={}",
                width, height, scale
            )));
        }

        let dims = Self {
            width,
            height,
            scale,
        };
        if dims.pixel_width() == 0 || dims.pixel_height() == 0 {
            return Err(CoverError::InvalidDimensions(format!(
                "surface {}x{} is empty",
                dims.pixel_width(),
                dims.pixel_height()
            )));
        }
        Ok(dims)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// 输出像素宽度
    pub fn pixel_width(&self) -> u32 {
        (self.width * self.scale).round() as u32
    }

    /// 输出像素高度
    pub fn pixel_height(&self) -> u32 {
        (self.height * self.scale).round() as u32
    }

    /// 检查像素总量上限
    pub fn ensure_within(&self, max_pixels: u64) -> Result<(), CoverError> {
        let pixels = self.pixel_width() as u64 * self.pixel_height() as u64;
        if pixels > max_pixels {
            return Err(CoverError::InvalidDimensions(format!(
                "surface {}x{} exceeds {} pixels",
                self.pixel_width(),
                self.pixel_height(),
                max_pixels
            )));
        }
        Ok(())
    }
}

impl Default for CoverDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_COVER_WIDTH,
            height: DEFAULT_COVER_HEIGHT,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(CoverColor::parse_hex("#303441").unwrap(), DEFAULT_TEXT_COLOR);
        assert_eq!(CoverColor::parse_hex("#fff").unwrap(), CoverColor::rgb(255, 255, 255));
        assert_eq!(CoverColor::parse_hex("#00000080").unwrap().a, 0x80);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(CoverColor::parse_hex("303441").is_err());
        assert!(CoverColor::parse_hex("#12345").is_err());
        assert!(CoverColor::parse_hex("#zzzzzz").is_err());
        assert!(CoverColor::parse_hex("#é12").is_err());
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(CoverColor::parse_or(Some("red"), DEFAULT_TEXT_COLOR), DEFAULT_TEXT_COLOR);
        assert_eq!(CoverColor::parse_or(None, DEFAULT_TEXT_COLOR), DEFAULT_TEXT_COLOR);
    }

    #[test]
    fn test_dimensions_scale_to_pixels() {
        let dims = CoverDimensions::new(400.0, 600.0, 2.0).unwrap();
        assert_eq!(dims.pixel_width(), 800);
        assert_eq!(dims.pixel_height(), 1200);
        assert!(dims.ensure_within(800 * 1200).is_ok());
        assert!(dims.ensure_within(800 * 1200 - 1).is_err());
    }

    #[test]
    fn test_dimensions_reject_non_positive() {
        assert!(CoverDimensions::new(0.0, 600.0, 1.0).is_err());
        assert!(CoverDimensions::new(400.0, 600.0, f32::NAN).is_err());
        assert!(CoverDimensions::new(400.0, 600.0, 0.0001).is_err());
    }
}
