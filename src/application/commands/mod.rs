//! 应用层 - 命令
//!
//! CQRS 命令侧：语音合成与服务商切换（不写入故事或封面数据）

mod narration_commands;

pub mod handlers;

pub use narration_commands::*;
