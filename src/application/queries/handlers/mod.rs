//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod book_handlers;
mod cover_handlers;
mod tts_handlers;

pub use book_handlers::*;
pub use cover_handlers::*;
pub use tts_handlers::*;
