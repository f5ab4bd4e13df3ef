//! SQLite Persistence - SQLite 数据库读取实现

mod cover_repo;
mod database;
mod story_repo;

pub use cover_repo::*;
pub use database::*;
pub use story_repo::*;
