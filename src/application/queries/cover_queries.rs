//! Cover Queries

use crate::domain::book::ProfileId;
use crate::domain::cover::CoverConfiguration;

/// 渲染用户已保存的封面（未保存时使用默认封面）
#[derive(Debug, Clone)]
pub struct RenderCover {
    pub profile_id: ProfileId,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
}

/// 渲染编辑中的封面配置
///
/// 同一用户的新预览会取代尚未完成的旧预览
#[derive(Debug, Clone)]
pub struct PreviewCover {
    pub profile_id: ProfileId,
    pub configuration: CoverConfiguration,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
}
