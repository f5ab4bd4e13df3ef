//! Narration Commands

use crate::domain::book::StoryId;

/// 朗读故事命令
#[derive(Debug, Clone)]
pub struct NarrateStory {
    pub story_id: StoryId,
    /// 指定服务商，None 时使用当前服务商
    pub provider: Option<String>,
    /// 指定音色，None 时使用服务商默认音色
    pub voice_id: Option<String>,
}

/// 切换当前 TTS 服务商命令
#[derive(Debug, Clone)]
pub struct SetActiveTtsProvider {
    pub provider: String,
}
