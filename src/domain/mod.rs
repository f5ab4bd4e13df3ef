//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Book Context: 故事、分页与成书进度
//! - Cover Context: 封面配置、字号与排版

pub mod book;
pub mod cover;
