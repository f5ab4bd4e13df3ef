//! TTS Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::queries::ListTtsProviders;
use crate::application::tts_registry::TtsProviderRegistry;

/// 服务商列表响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsProvidersResponse {
    pub providers: Vec<String>,
    pub active: Option<String>,
}

impl TtsProvidersResponse {
    pub fn from_registry(registry: &TtsProviderRegistry) -> Self {
        Self {
            providers: registry.registered_kinds(),
            active: registry.active_kind(),
        }
    }
}

/// ListTtsProviders Handler
pub struct ListTtsProvidersHandler {
    registry: Arc<TtsProviderRegistry>,
}

impl ListTtsProvidersHandler {
    pub fn new(registry: Arc<TtsProviderRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        _query: ListTtsProviders,
    ) -> Result<TtsProvidersResponse, ApplicationError> {
        Ok(TtsProvidersResponse::from_registry(&self.registry))
    }
}
