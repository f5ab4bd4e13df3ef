//! TTS Provider Registry - 语音合成服务商注册表
//!
//! 由应用状态持有（依赖注入），不使用进程级全局变量。
//! 第一个注册的服务商自动成为当前服务商。

use dashmap::DashMap;
use std::sync::{Arc, RwLock};

use crate::application::ports::{TtsEnginePort, TtsError};

/// 服务商注册表
pub struct TtsProviderRegistry {
    providers: DashMap<String, Arc<dyn TtsEnginePort>>,
    active: RwLock<Option<String>>,
}

impl TtsProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
            active: RwLock::new(None),
        }
    }

    /// 注册服务商（同名覆盖）
    pub fn register(&self, kind: impl Into<String>, provider: Arc<dyn TtsEnginePort>) {
        let kind = kind.into();
        self.providers.insert(kind.clone(), provider);

        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        if active.is_none() {
            *active = Some(kind.clone());
        }
        tracing::info!(provider = %kind, active = ?*active, "TTS provider registered");
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn TtsEnginePort>> {
        self.providers.get(kind).map(|p| Arc::clone(p.value()))
    }

    /// 切换当前服务商，未注册时报错
    pub fn set_active(&self, kind: &str) -> Result<(), TtsError> {
        if !self.providers.contains_key(kind) {
            return Err(TtsError::ProviderNotRegistered(kind.to_string()));
        }
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = Some(kind.to_string());
        tracing::info!(provider = %kind, "Active TTS provider switched");
        Ok(())
    }

    /// 当前服务商
    pub fn active(&self) -> Result<Arc<dyn TtsEnginePort>, TtsError> {
        let kind = self.active_kind().ok_or(TtsError::NoActiveProvider)?;
        self.get(&kind).ok_or(TtsError::NoActiveProvider)
    }

    pub fn active_kind(&self) -> Option<String> {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 已注册的服务商（按名称排序）
    pub fn registered_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        kinds.sort();
        kinds
    }

    /// 清空注册表
    pub fn clear(&self) {
        self.providers.clear();
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl Default for TtsProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 测试用 TTS 服务商：返回文本字节作为“音频”
#[cfg(test)]
pub(crate) struct EchoTtsEngine {
    pub content_type: &'static str,
}

#[cfg(test)]
#[async_trait::async_trait]
impl TtsEnginePort for EchoTtsEngine {
    async fn synthesize(
        &self,
        request: crate::application::ports::SynthesisRequest,
    ) -> Result<crate::application::ports::SynthesisResponse, TtsError> {
        Ok(crate::application::ports::SynthesisResponse {
            audio_data: request.text.into_bytes(),
            content_type: self.content_type.to_string(),
            duration_ms: None,
        })
    }
}
