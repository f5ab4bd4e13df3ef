//! Narration Command Handlers

use std::sync::Arc;

use crate::application::commands::{NarrateStory, SetActiveTtsProvider};
use crate::application::error::ApplicationError;
use crate::application::ports::{StoryRepositoryPort, SynthesisRequest, TtsError};
use crate::application::queries::handlers::TtsProvidersResponse;
use crate::application::tts_registry::TtsProviderRegistry;
use crate::domain::book::{split_paragraphs, Story, StoryId};

/// 朗读结果
#[derive(Debug, Clone)]
pub struct NarrationResponse {
    pub story_id: StoryId,
    pub provider: String,
    pub audio_data: Vec<u8>,
    pub content_type: String,
    pub duration_ms: Option<u64>,
}

/// 朗读文本：标题 + 段落，空行分隔
fn narration_text(story: &Story) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(title) = story.title() {
        parts.push(title.trim());
    }
    parts.extend(split_paragraphs(story.content()));
    parts.join("\n\n")
}

// ============================================================================
// NarrateStory
// ============================================================================

/// NarrateStory Handler
pub struct NarrateStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    registry: Arc<TtsProviderRegistry>,
}

impl NarrateStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, registry: Arc<TtsProviderRegistry>) -> Self {
        Self {
            story_repo,
            registry,
        }
    }

    pub async fn handle(&self, command: NarrateStory) -> Result<NarrationResponse, ApplicationError> {
        let story = self
            .story_repo
            .find_by_id(command.story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", *command.story_id.as_uuid()))?;

        if split_paragraphs(story.content()).is_empty() {
            return Err(ApplicationError::validation("Story has no text to narrate"));
        }

        let (provider_kind, engine) = match command.provider {
            Some(kind) => {
                let engine = self
                    .registry
                    .get(&kind)
                    .ok_or_else(|| TtsError::ProviderNotRegistered(kind.clone()))?;
                (kind, engine)
            }
            None => {
                let engine = self.registry.active()?;
                let kind = self.registry.active_kind().unwrap_or_default();
                (kind, engine)
            }
        };

        let text = narration_text(&story);
        tracing::info!(
            story_id = %command.story_id,
            provider = %provider_kind,
            text_len = text.chars().count(),
            "Narrating story"
        );

        let response = engine
            .synthesize(SynthesisRequest {
                text,
                voice_id: command.voice_id,
            })
            .await
            .map_err(|e| {
                tracing::error!(story_id = %command.story_id, provider = %provider_kind, error = %e, "Narration failed");
                ApplicationError::from(e)
            })?;

        Ok(NarrationResponse {
            story_id: command.story_id,
            provider: provider_kind,
            audio_data: response.audio_data,
            content_type: response.content_type,
            duration_ms: response.duration_ms,
        })
    }
}

// ============================================================================
// SetActiveTtsProvider
// ============================================================================

/// SetActiveTtsProvider Handler
pub struct SetActiveTtsProviderHandler {
    registry: Arc<TtsProviderRegistry>,
}

impl SetActiveTtsProviderHandler {
    pub fn new(registry: Arc<TtsProviderRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        command: SetActiveTtsProvider,
    ) -> Result<TtsProvidersResponse, ApplicationError> {
        self.registry.set_active(command.provider.trim())?;
        Ok(TtsProvidersResponse::from_registry(&self.registry))
    }
}
