//! 封面配置
//!
//! 与前端保存在 `book_covers.cover_data` 中的 JSON 结构一致（camelCase 字段）

use serde::{Deserialize, Deserializer, Serialize};

use super::{CoverColor, DEFAULT_TEXT_COLOR};

/// 标题/作者的纵向排版方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverLayout {
    #[default]
    Centered,
    Top,
    Bottom,
}

impl CoverLayout {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "centered" | "center" => Some(CoverLayout::Centered),
            "top" => Some(CoverLayout::Top),
            "bottom" => Some(CoverLayout::Bottom),
            _ => None,
        }
    }

    /// 标题首行基线位置（占画布高度的比例）
    pub fn title_anchor(&self) -> f32 {
        match self {
            CoverLayout::Top => 0.2,
            CoverLayout::Centered => 0.45,
            CoverLayout::Bottom => 0.65,
        }
    }

    /// 作者基线位置（占画布高度的比例，不含标题偏移）
    pub fn author_anchor(&self) -> f32 {
        match self {
            CoverLayout::Top => 0.3,
            CoverLayout::Centered => 0.55,
            CoverLayout::Bottom => 0.75,
        }
    }
}

/// 未知或缺失的排版值按居中处理
impl<'de> Deserialize<'de> for CoverLayout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(CoverLayout::from_name)
            .unwrap_or_default())
    }
}

/// 封面配置（值对象）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverConfiguration {
    /// 背景色（`#rrggbb`）
    pub background_color: Option<String>,
    /// 背景图 URL
    pub background_image: Option<String>,
    pub title_text: Option<String>,
    pub author_text: Option<String>,
    pub title_color: Option<String>,
    pub author_color: Option<String>,
    /// 标题字号偏好（18-24 映射到 0.85-1.15 倍）
    pub title_size: Option<f32>,
    /// 作者字号偏好（12-16 映射到 0.9-1.1 倍）
    pub author_size: Option<f32>,
    pub layout: CoverLayout,
}

impl CoverConfiguration {
    /// 未保存封面时使用的默认封面
    pub fn placeholder(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            background_color: Some("#f5f5f0".to_string()),
            title_text: Some(title.into()),
            author_text: Some(author.into()),
            ..Self::default()
        }
    }

    /// 去除首尾空白后的标题，空标题返回 None
    pub fn title(&self) -> Option<&str> {
        self.title_text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn author(&self) -> Option<&str> {
        self.author_text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// 背景色，无法解析时视为未设置
    pub fn background(&self) -> Option<CoverColor> {
        self.background_color
            .as_deref()
            .and_then(|c| CoverColor::parse_hex(c).ok())
    }

    pub fn background_image_url(&self) -> Option<&str> {
        self.background_image
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn title_color(&self) -> CoverColor {
        CoverColor::parse_or(self.title_color.as_deref(), DEFAULT_TEXT_COLOR)
    }

    pub fn author_color(&self) -> CoverColor {
        CoverColor::parse_or(self.author_color.as_deref(), DEFAULT_TEXT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r##"{
            "backgroundColor": "#155B4A",
            "titleText": "Summers at the Lake",
            "authorText": "Ada",
            "titleSize": 21,
            "layout": "top"
        }"##;
        let config: CoverConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.title(), Some("Summers at the Lake"));
        assert_eq!(config.title_size, Some(21.0));
        assert_eq!(config.layout, CoverLayout::Top);
        assert_eq!(config.background(), Some(CoverColor::rgb(0x15, 0x5b, 0x4a)));
        assert_eq!(config.title_color(), DEFAULT_TEXT_COLOR);
    }

    #[test]
    fn test_unknown_or_null_layout_is_centered() {
        let config: CoverConfiguration =
            serde_json::from_str(r#"{"layout": "diagonal", "titleText": null}"#).unwrap();
        assert_eq!(config.layout, CoverLayout::Centered);
        assert_eq!(config.title(), None);

        let config: CoverConfiguration = serde_json::from_str(r#"{"layout": null}"#).unwrap();
        assert_eq!(config.layout, CoverLayout::Centered);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let config = CoverConfiguration {
            title_text: Some("   ".to_string()),
            background_image: Some("".to_string()),
            background_color: Some("not-a-color".to_string()),
            ..CoverConfiguration::default()
        };
        assert_eq!(config.title(), None);
        assert_eq!(config.background_image_url(), None);
        assert_eq!(config.background(), None);
    }
}
