//! HTTP Handlers

mod book;
mod cover;
mod narration;
mod ping;
mod tts;

pub use book::*;
pub use cover::*;
pub use narration::*;
pub use ping::*;
pub use tts::*;
