//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "NARRA";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `NARRA_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `NARRA_SERVER__PORT=8080`
/// - `NARRA_DATABASE__PATH=/data/narra.db`
/// - `NARRA_PAGINATION__MEDIA_POLICY=flat`
/// - `NARRA_TTS__ELEVENLABS__API_KEY=...`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("database.path", "data/narra.db")?
        .set_default("database.max_connections", 5)?
        .set_default("database.run_migrations", true)?
        .set_default("pagination.chars_per_page", 1500)?
        .set_default("pagination.first_page_reserved", 150)?
        .set_default("pagination.media_policy", "per_item")?
        .set_default("pagination.pages_per_media_item", 1.0)?
        .set_default("pagination.minimum_pages", 32)?
        .set_default("cover.width", 400.0)?
        .set_default("cover.height", 600.0)?
        .set_default("cover.scale", 1.0)?
        .set_default("cover.max_pixels", 16_000_000)?
        .set_default("image.timeout_secs", 10)?
        .set_default("image.max_bytes", 10 * 1024 * 1024)?
        .set_default("image.max_dimension", 8192)?
        .set_default("tts.http.enabled", true)?
        .set_default("tts.http.url", "http://localhost:8000")?
        .set_default("tts.http.timeout_secs", 120)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），名称会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

    if config.server.port == 0 {
        return invalid("Server port cannot be 0");
    }

    if config.database.path.is_empty() {
        return invalid("Database path cannot be empty");
    }

    let pagination = &config.pagination;
    if pagination.chars_per_page == 0 {
        return invalid("pagination.chars_per_page must be positive");
    }
    if pagination.first_page_reserved >= pagination.chars_per_page {
        return invalid("pagination.first_page_reserved must be smaller than chars_per_page");
    }
    if pagination.media_page_policy().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "Unknown pagination.media_policy: {} (expected ignore, flat or per_item)",
            pagination.media_policy
        )));
    }
    if !(pagination.pages_per_media_item.is_finite() && pagination.pages_per_media_item >= 0.0) {
        return invalid("pagination.pages_per_media_item must be a non-negative number");
    }

    let cover = &config.cover;
    let positive = |v: f32| v.is_finite() && v > 0.0;
    if !positive(cover.width) || !positive(cover.height) || !positive(cover.scale) {
        return invalid("cover width, height and scale must be positive");
    }
    if cover.max_pixels == 0 {
        return invalid("cover.max_pixels cannot be 0");
    }

    if config.image.max_bytes == 0 {
        return invalid("image.max_bytes cannot be 0");
    }
    if config.image.max_dimension == 0 {
        return invalid("image.max_dimension cannot be 0");
    }

    if config.tts.http.enabled && config.tts.http.url.is_empty() {
        return invalid("TTS URL cannot be empty");
    }
    if let Some(active) = &config.tts.active {
        let registered = match active.as_str() {
            "http" => config.tts.http.enabled,
            "elevenlabs" => config.tts.elevenlabs.is_configured(),
            _ => false,
        };
        if !registered {
            return Err(ConfigError::ValidationError(format!(
                "tts.active refers to a provider that is not configured: {}",
                active
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!(
        "Pagination: {} chars/page, {} reserved, media policy {}",
        config.pagination.chars_per_page,
        config.pagination.first_page_reserved,
        config.pagination.media_policy
    );
    tracing::info!(
        "Cover: {}x{} @{}x, font {:?}",
        config.cover.width,
        config.cover.height,
        config.cover.scale,
        config.cover.font_path
    );
    if config.tts.http.enabled {
        tracing::info!("TTS (http): {}", config.tts.http.url);
    }
    if config.tts.elevenlabs.is_configured() {
        tracing::info!("TTS (elevenlabs): {}", config.tts.elevenlabs.base_url);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_reserved_exceeding_page() {
        let mut config = AppConfig::default();
        config.pagination.first_page_reserved = 1500;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_unknown_media_policy() {
        let mut config = AppConfig::default();
        config.pagination.media_policy = "sideways".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_unconfigured_active_provider() {
        let mut config = AppConfig::default();
        config.tts.active = Some("elevenlabs".to_string());
        assert!(validate_config(&config).is_err());

        config.tts.elevenlabs.api_key = Some("sk-test".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_bad_cover_scale() {
        let mut config = AppConfig::default();
        config.cover.scale = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[pagination]
media_policy = "flat"

[cover]
title_font_path = "fonts/Bold.ttf"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.pagination.media_policy, "flat");
        assert_eq!(config.pagination.chars_per_page, 1500);
        assert_eq!(
            config.cover.title_font_path.as_deref(),
            Some(Path::new("fonts/Bold.ttf"))
        );
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pagination]\nchars_per_page = 0").unwrap();
        assert!(matches!(
            load_config_from_path(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
