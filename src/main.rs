//! Narra - 家庭故事成书服务
//!
//! - Domain: book/, cover/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, rendering, adapters

use std::sync::Arc;

use anyhow::Context;
use narra::application::{CoverRenderSettings, TtsProviderRegistry};
use narra::config::{load_config, print_config, AppConfig};
use narra::domain::book::PageEstimator;
use narra::infrastructure::adapters::{
    ElevenLabsClient, ElevenLabsClientConfig, HttpImageLoader, HttpImageLoaderConfig,
    HttpTtsClient, HttpTtsClientConfig, ELEVENLABS_PROVIDER, HTTP_PROVIDER,
};
use narra::infrastructure::http::{AppSettings, AppState, HttpServer, ServerConfig};
use narra::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteCoverRepository, SqliteStoryRepository,
};
use narra::infrastructure::rendering::{GlyphTextMeasurer, RasterCoverRenderer};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},narra={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置注册 TTS 服务商，先注册者默认为当前服务商
fn build_tts_registry(config: &AppConfig) -> anyhow::Result<Arc<TtsProviderRegistry>> {
    let registry = Arc::new(TtsProviderRegistry::new());

    if config.tts.http.enabled {
        let client_config = HttpTtsClientConfig::new(&config.tts.http.url)
            .with_timeout(config.tts.http.timeout_secs)
            .with_default_voice(config.tts.http.default_voice.clone());
        registry.register(HTTP_PROVIDER, Arc::new(HttpTtsClient::new(client_config)?));
    }

    if let Some(api_key) = config
        .tts
        .elevenlabs
        .api_key
        .as_deref()
        .filter(|_| config.tts.elevenlabs.is_configured())
    {
        let client_config = ElevenLabsClientConfig {
            base_url: config.tts.elevenlabs.base_url.clone(),
            voice_id: config.tts.elevenlabs.voice_id.clone(),
            model_id: config.tts.elevenlabs.model_id.clone(),
            timeout_secs: config.tts.elevenlabs.timeout_secs,
            ..ElevenLabsClientConfig::new(api_key)
        };
        registry.register(
            ELEVENLABS_PROVIDER,
            Arc::new(ElevenLabsClient::new(client_config)?),
        );
    }

    if let Some(active) = config.tts.active.as_deref() {
        registry
            .set_active(active)
            .with_context(|| format!("Cannot activate TTS provider '{}'", active))?;
    }

    if registry.active_kind().is_none() {
        tracing::warn!("No TTS provider registered, narration is disabled");
    }

    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().context("Failed to load config")?;

    init_tracing(&config);

    tracing::info!("Narra - 家庭故事成书服务");
    print_config(&config);

    // 初始化数据库
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    // 创建 Repository 适配器
    let story_repo = Arc::new(SqliteStoryRepository::new(pool.clone()));
    let cover_repo = Arc::new(SqliteCoverRepository::new(pool.clone()));

    // 封面渲染
    let measurer = GlyphTextMeasurer::load(
        &config.cover.font_path,
        config.cover.title_font_path.as_deref(),
    )?;
    let rasterizer = Arc::new(RasterCoverRenderer::new(measurer));
    let image_loader = Arc::new(HttpImageLoader::new(HttpImageLoaderConfig {
        timeout_secs: config.image.timeout_secs,
        max_bytes: config.image.max_bytes,
        max_dimension: config.image.max_dimension,
        ..HttpImageLoaderConfig::default()
    })?);

    let tts_registry = build_tts_registry(&config)?;

    let settings = AppSettings {
        estimator: PageEstimator::new(config.pagination.to_pagination_config()),
        minimum_pages: config.pagination.minimum_pages,
        cover: CoverRenderSettings {
            width: config.cover.width,
            height: config.cover.height,
            scale: config.cover.scale,
            max_pixels: config.cover.max_pixels,
            default_title: config.cover.default_title.clone(),
            default_author: config.cover.default_author.clone(),
        },
    };

    let state = AppState::new(
        story_repo,
        cover_repo,
        image_loader,
        rasterizer,
        tts_registry,
        settings,
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_cors_origins(config.server.cors_origins.clone());
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
