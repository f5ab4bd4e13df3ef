//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::book::{
    MediaPagePolicy, PaginationConfig, DEFAULT_CHARS_PER_PAGE, DEFAULT_FIRST_PAGE_RESERVED,
    DEFAULT_MINIMUM_PAGES, DEFAULT_PAGES_PER_MEDIA_ITEM,
};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 分页配置
    #[serde(default)]
    pub pagination: PaginationSettings,

    /// 封面渲染配置
    #[serde(default)]
    pub cover: CoverConfig,

    /// 背景图下载配置
    #[serde(default)]
    pub image: ImageConfig,

    /// TTS 服务商配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 允许的跨域来源，空表示允许任意来源
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// 启动时创建缺失的表（本地运行与测试用）
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_db_path() -> String {
    "data/narra.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: default_run_migrations(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 分页配置
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    /// 每页字符预算
    #[serde(default = "default_chars_per_page")]
    pub chars_per_page: usize,

    /// 故事首页预留字符数（标题与日期）
    #[serde(default = "default_first_page_reserved")]
    pub first_page_reserved: usize,

    /// 媒体页策略: ignore / flat / per_item
    #[serde(default = "default_media_policy")]
    pub media_policy: String,

    /// per_item 策略下每个媒体占用的页数
    #[serde(default = "default_pages_per_media_item")]
    pub pages_per_media_item: f64,

    /// 可印刷成书的最少页数
    #[serde(default = "default_minimum_pages")]
    pub minimum_pages: usize,
}

fn default_chars_per_page() -> usize {
    DEFAULT_CHARS_PER_PAGE
}

fn default_first_page_reserved() -> usize {
    DEFAULT_FIRST_PAGE_RESERVED
}

fn default_media_policy() -> String {
    "per_item".to_string()
}

fn default_pages_per_media_item() -> f64 {
    DEFAULT_PAGES_PER_MEDIA_ITEM
}

fn default_minimum_pages() -> usize {
    DEFAULT_MINIMUM_PAGES
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            chars_per_page: default_chars_per_page(),
            first_page_reserved: default_first_page_reserved(),
            media_policy: default_media_policy(),
            pages_per_media_item: default_pages_per_media_item(),
            minimum_pages: default_minimum_pages(),
        }
    }
}

impl PaginationSettings {
    pub fn media_page_policy(&self) -> Option<MediaPagePolicy> {
        MediaPagePolicy::from_name(&self.media_policy, self.pages_per_media_item)
    }

    /// 转换为领域分页参数；策略名无效时使用默认策略
    pub fn to_pagination_config(&self) -> PaginationConfig {
        PaginationConfig {
            chars_per_page: self.chars_per_page,
            first_page_reserved: self.first_page_reserved,
            media_policy: self.media_page_policy().unwrap_or_default(),
        }
    }
}

/// 封面渲染配置
#[derive(Debug, Clone, Deserialize)]
pub struct CoverConfig {
    /// 默认逻辑宽度
    #[serde(default = "default_cover_width")]
    pub width: f32,

    /// 默认逻辑高度
    #[serde(default = "default_cover_height")]
    pub height: f32,

    /// 默认像素缩放倍数
    #[serde(default = "default_cover_scale")]
    pub scale: f32,

    /// 输出像素总量上限
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,

    /// 正文字体文件（TTF/OTF）
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,

    /// 标题粗体字体文件，未设置时使用正文字体
    #[serde(default)]
    pub title_font_path: Option<PathBuf>,

    /// 未保存封面时默认封面的标题
    #[serde(default = "default_cover_title")]
    pub default_title: String,

    /// 未保存封面时默认封面的作者
    #[serde(default)]
    pub default_author: String,
}

fn default_cover_width() -> f32 {
    400.0
}

fn default_cover_height() -> f32 {
    600.0
}

fn default_cover_scale() -> f32 {
    1.0
}

fn default_max_pixels() -> u64 {
    16_000_000
}

fn default_font_path() -> PathBuf {
    PathBuf::from("assets/fonts/DejaVuSerif.ttf")
}

fn default_cover_title() -> String {
    "My Story Book".to_string()
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            width: default_cover_width(),
            height: default_cover_height(),
            scale: default_cover_scale(),
            max_pixels: default_max_pixels(),
            font_path: default_font_path(),
            title_font_path: None,
            default_title: default_cover_title(),
            default_author: String::new(),
        }
    }
}

/// 背景图下载配置
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// 下载超时时间（秒）
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,

    /// 最大下载字节数
    #[serde(default = "default_image_max_bytes")]
    pub max_bytes: usize,

    /// 解码后的最大宽/高（像素）
    #[serde(default = "default_image_max_dimension")]
    pub max_dimension: u32,
}

fn default_image_timeout() -> u64 {
    10
}

fn default_image_max_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

fn default_image_max_dimension() -> u32 {
    8192
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_image_timeout(),
            max_bytes: default_image_max_bytes(),
            max_dimension: default_image_max_dimension(),
        }
    }
}

/// TTS 服务商配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TtsConfig {
    /// 启动后的当前服务商，未设置时为第一个注册的服务商
    #[serde(default)]
    pub active: Option<String>,

    /// 自建 HTTP TTS 服务
    #[serde(default)]
    pub http: HttpTtsConfig,

    /// ElevenLabs
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
}

/// 自建 HTTP TTS 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpTtsConfig {
    /// 是否注册该服务商
    #[serde(default = "default_http_tts_enabled")]
    pub enabled: bool,

    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 默认参考音色
    #[serde(default)]
    pub default_voice: Option<String>,
}

fn default_http_tts_enabled() -> bool {
    true
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

impl Default for HttpTtsConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_tts_enabled(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            default_voice: None,
        }
    }
}

/// ElevenLabs 配置（设置 api_key 后注册）
#[derive(Debug, Clone, Deserialize)]
pub struct ElevenLabsConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_elevenlabs_url")]
    pub base_url: String,

    /// 默认音色 ID
    #[serde(default = "default_elevenlabs_voice")]
    pub voice_id: String,

    #[serde(default = "default_elevenlabs_model")]
    pub model_id: String,

    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_elevenlabs_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_elevenlabs_voice() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_elevenlabs_model() -> String {
    "eleven_multilingual_v2".to_string()
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_elevenlabs_url(),
            voice_id: default_elevenlabs_voice(),
            model_id: default_elevenlabs_model(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

impl ElevenLabsConfig {
    /// 已配置非空 API Key
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
