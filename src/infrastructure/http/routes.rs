//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                                      GET   健康检查
//! - /api/profiles/:profile_id/book                 GET   成书分页概要
//! - /api/profiles/:profile_id/book/progress        GET   成书进度
//! - /api/profiles/:profile_id/book/pages/:page     GET   单页内容
//! - /api/profiles/:profile_id/cover.png            GET   渲染已保存的封面
//! - /api/profiles/:profile_id/cover/preview        POST  渲染编辑中的封面
//! - /api/tts/providers                             GET   列出 TTS 服务商
//! - /api/tts/providers/active                      POST  切换当前服务商
//! - /api/stories/:story_id/narration               POST  朗读故事

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/profiles/:profile_id", profile_routes())
        .nest("/tts", tts_routes())
        .route("/stories/:story_id/narration", post(handlers::narrate_story))
}

/// Profile 路由（成书 + 封面）
fn profile_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/book", get(handlers::get_book))
        .route("/book/progress", get(handlers::get_book_progress))
        .route("/book/pages/:page", get(handlers::get_book_page))
        .route("/cover.png", get(handlers::get_cover))
        .route("/cover/preview", post(handlers::preview_cover))
}

/// TTS 路由
fn tts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/providers", get(handlers::list_tts_providers))
        .route("/providers/active", post(handlers::set_active_tts_provider))
}
