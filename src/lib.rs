//! Narra - 家庭故事成书服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 故事分页、页面内容、成书进度
//! - Cover Context: 封面配置、字号映射、换行与排版
//!
//! 应用层 (application/):
//! - Ports: 端口定义（StoryRepository, CoverRepository, ImageLoader, CoverRasterizer, TtsEngine）
//! - Commands: 朗读故事、切换 TTS 服务商
//! - Queries: 分页、书页、进度、封面渲染
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 只读仓储
//! - Memory: 内存仓储
//! - Rendering: ab_glyph + imageproc 封面合成
//! - Adapters: 背景图加载、TTS 服务商客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
