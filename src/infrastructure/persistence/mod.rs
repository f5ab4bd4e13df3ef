//! Persistence Layer - 数据持久化
//!
//! SQLite 只读仓储实现

pub mod sqlite;
