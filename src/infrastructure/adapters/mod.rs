//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod image_loader;
pub mod tts;

pub use image_loader::*;
pub use tts::*;
