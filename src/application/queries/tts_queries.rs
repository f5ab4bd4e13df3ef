//! TTS Queries

/// 列出已注册的 TTS 服务商
#[derive(Debug, Clone)]
pub struct ListTtsProviders;
