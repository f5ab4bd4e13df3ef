//! Cover Query Handlers
//!
//! 渲染分两阶段：异步加载背景图，然后在阻塞线程池上合成图层。
//! 预览渲染在两阶段之间检查令牌，过期的渲染直接丢弃。

use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{CoverRasterizerPort, CoverRepositoryPort, ImageLoaderPort};
use crate::application::queries::{PreviewCover, RenderCover};
use crate::application::render_supervisor::{RenderSupervisor, RenderTicket};
use crate::domain::cover::{plan_cover, CoverConfiguration, CoverDimensions};

/// 渲染参数默认值与上限
#[derive(Debug, Clone)]
pub struct CoverRenderSettings {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    /// 输出像素总量上限
    pub max_pixels: u64,
    /// 未保存封面时默认封面的标题
    pub default_title: String,
    /// 未保存封面时默认封面的作者
    pub default_author: String,
}

impl Default for CoverRenderSettings {
    fn default() -> Self {
        Self {
            width: crate::domain::cover::DEFAULT_COVER_WIDTH,
            height: crate::domain::cover::DEFAULT_COVER_HEIGHT,
            scale: 1.0,
            max_pixels: 16_000_000,
            default_title: "My Story Book".to_string(),
            default_author: String::new(),
        }
    }
}

impl CoverRenderSettings {
    fn dimensions(
        &self,
        width: Option<f32>,
        height: Option<f32>,
        scale: Option<f32>,
    ) -> Result<CoverDimensions, ApplicationError> {
        let dims = CoverDimensions::new(
            width.unwrap_or(self.width),
            height.unwrap_or(self.height),
            scale.unwrap_or(self.scale),
        )?;
        dims.ensure_within(self.max_pixels)?;
        Ok(dims)
    }
}

/// 渲染结果
#[derive(Debug, Clone)]
pub struct CoverImageResponse {
    pub image: RgbaImage,
    /// 背景图是否成功绘制
    pub background_loaded: bool,
}

/// 封面渲染器：编排背景加载与图层合成
pub struct CoverRenderer {
    image_loader: Arc<dyn ImageLoaderPort>,
    rasterizer: Arc<dyn CoverRasterizerPort>,
}

impl CoverRenderer {
    pub fn new(
        image_loader: Arc<dyn ImageLoaderPort>,
        rasterizer: Arc<dyn CoverRasterizerPort>,
    ) -> Self {
        Self {
            image_loader,
            rasterizer,
        }
    }

    /// 第一阶段：加载背景图，失败时记录日志并视为无背景图
    pub async fn load_background(&self, config: &CoverConfiguration) -> Option<DynamicImage> {
        let url = config.background_image_url()?;
        match self.image_loader.load(url).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Background image load failed, rendering without it");
                None
            }
        }
    }

    /// 第二阶段：在阻塞线程池上合成 背景 → 标题 → 作者
    pub async fn compose(
        &self,
        config: &CoverConfiguration,
        dims: &CoverDimensions,
        background: Option<DynamicImage>,
    ) -> Result<RgbaImage, ApplicationError> {
        let rasterizer = self.rasterizer.clone();
        let config = config.clone();
        let dims = *dims;

        tokio::task::spawn_blocking(move || {
            let plan = plan_cover(&config, &dims, rasterizer.measurer());
            rasterizer.compose(&plan, background.as_ref())
        })
        .await
        .map_err(|e| ApplicationError::internal(format!("Cover compose task failed: {}", e)))
    }

    /// 完整渲染；携带令牌时在背景加载后检查是否已被取代
    pub async fn render(
        &self,
        config: &CoverConfiguration,
        dims: &CoverDimensions,
        guard: Option<(&RenderSupervisor, &RenderTicket)>,
    ) -> Result<CoverImageResponse, ApplicationError> {
        let background = self.load_background(config).await;

        if let Some((supervisor, ticket)) = guard {
            supervisor.ensure_current(ticket)?;
        }

        let background_loaded = background.is_some();
        let image = self.compose(config, dims, background).await?;
        Ok(CoverImageResponse {
            image,
            background_loaded,
        })
    }
}

/// RenderCover Handler
pub struct RenderCoverHandler {
    cover_repo: Arc<dyn CoverRepositoryPort>,
    renderer: Arc<CoverRenderer>,
    settings: CoverRenderSettings,
}

impl RenderCoverHandler {
    pub fn new(
        cover_repo: Arc<dyn CoverRepositoryPort>,
        renderer: Arc<CoverRenderer>,
        settings: CoverRenderSettings,
    ) -> Self {
        Self {
            cover_repo,
            renderer,
            settings,
        }
    }

    pub async fn handle(&self, query: RenderCover) -> Result<CoverImageResponse, ApplicationError> {
        let dims = self
            .settings
            .dimensions(query.width, query.height, query.scale)?;

        let config = match self.cover_repo.find_by_profile(query.profile_id).await? {
            Some(config) => config,
            None => {
                tracing::debug!(profile_id = %query.profile_id, "No saved cover, using placeholder");
                CoverConfiguration::placeholder(
                    self.settings.default_title.clone(),
                    self.settings.default_author.clone(),
                )
            }
        };

        let response = self.renderer.render(&config, &dims, None).await?;

        tracing::info!(
            profile_id = %query.profile_id,
            width = response.image.width(),
            height = response.image.height(),
            background_loaded = response.background_loaded,
            "Cover rendered"
        );
        Ok(response)
    }
}

/// PreviewCover Handler
pub struct PreviewCoverHandler {
    renderer: Arc<CoverRenderer>,
    supervisor: Arc<RenderSupervisor>,
    settings: CoverRenderSettings,
}

impl PreviewCoverHandler {
    pub fn new(
        renderer: Arc<CoverRenderer>,
        supervisor: Arc<RenderSupervisor>,
        settings: CoverRenderSettings,
    ) -> Self {
        Self {
            renderer,
            supervisor,
            settings,
        }
    }

    pub async fn handle(&self, query: PreviewCover) -> Result<CoverImageResponse, ApplicationError> {
        let dims = self
            .settings
            .dimensions(query.width, query.height, query.scale)?;

        let ticket = self.supervisor.begin(query.profile_id.to_string());
        let result = self
            .renderer
            .render(&query.configuration, &dims, Some((&self.supervisor, &ticket)))
            .await;
        self.supervisor.finish(&ticket);

        if let Ok(response) = &result {
            tracing::debug!(
                profile_id = %query.profile_id,
                token = ticket.token,
                width = response.image.width(),
                height = response.image.height(),
                "Cover preview rendered"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::Rgba;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    use crate::application::ports::ImageLoadError;
    use crate::domain::book::ProfileId;
    use crate::domain::cover::{CoverPlan, FixedAdvanceMeasurer, TextMeasurer};
    use crate::infrastructure::memory::InMemoryCoverRepository;

    /// 记录收到的排版计划，输出纯色画布
    struct RecordingRasterizer {
        measurer: FixedAdvanceMeasurer,
        plans: Mutex<Vec<(CoverPlan, bool)>>,
        threads: Mutex<Vec<std::thread::ThreadId>>,
    }

    impl RecordingRasterizer {
        fn new() -> Self {
            Self {
                measurer: FixedAdvanceMeasurer { advance: 0.5 },
                plans: Mutex::new(Vec::new()),
                threads: Mutex::new(Vec::new()),
            }
        }
    }

    impl CoverRasterizerPort for RecordingRasterizer {
        fn measurer(&self) -> &dyn TextMeasurer {
            &self.measurer
        }

        fn compose(&self, plan: &CoverPlan, background: Option<&DynamicImage>) -> RgbaImage {
            self.threads.lock().unwrap().push(std::thread::current().id());
            self.plans
                .lock()
                .unwrap()
                .push((plan.clone(), background.is_some()));
            RgbaImage::from_pixel(plan.width, plan.height, Rgba([0, 0, 0, 0]))
        }
    }

    /// 可控的图片加载器
    struct StubLoader {
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl ImageLoaderPort for StubLoader {
        async fn load(&self, url: &str) -> Result<DynamicImage, ImageLoadError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(ImageLoadError::NetworkError(format!("unreachable: {}", url)));
            }
            Ok(DynamicImage::new_rgba8(4, 4))
        }
    }

    fn renderer(loader: StubLoader) -> (Arc<CoverRenderer>, Arc<RecordingRasterizer>) {
        let rasterizer = Arc::new(RecordingRasterizer::new());
        let renderer = Arc::new(CoverRenderer::new(Arc::new(loader), rasterizer.clone()));
        (renderer, rasterizer)
    }

    fn with_background() -> CoverConfiguration {
        CoverConfiguration {
            background_image: Some("https://images.example/bg.jpg".into()),
            title_text: Some("Family Recipes".into()),
            ..CoverConfiguration::default()
        }
    }

    #[tokio::test]
    async fn test_render_uses_placeholder_when_missing() {
        let (renderer, rasterizer) = renderer(StubLoader {
            fail: false,
            gate: None,
        });
        let handler = RenderCoverHandler::new(
            InMemoryCoverRepository::new().arc(),
            renderer,
            CoverRenderSettings::default(),
        );

        let response = handler
            .handle(RenderCover {
                profile_id: ProfileId::new(),
                width: None,
                height: None,
                scale: Some(2.0),
            })
            .await
            .unwrap();

        assert_eq!(response.image.dimensions(), (800, 1200));
        let plans = rasterizer.plans.lock().unwrap();
        let title = plans[0].0.title.as_ref().unwrap();
        assert_eq!(title.lines[0].text, "My Story Book");
        assert!(plans[0].0.author.is_none());
    }

    #[tokio::test]
    async fn test_render_stored_cover() {
        let (renderer, rasterizer) = renderer(StubLoader {
            fail: false,
            gate: None,
        });
        let repo = InMemoryCoverRepository::new().arc();
        let profile_id = ProfileId::new();
        repo.insert(profile_id, with_background());

        let handler = RenderCoverHandler::new(repo, renderer, CoverRenderSettings::default());
        let response = handler
            .handle(RenderCover {
                profile_id,
                width: None,
                height: None,
                scale: None,
            })
            .await
            .unwrap();

        assert!(response.background_loaded);
        assert!(rasterizer.plans.lock().unwrap()[0].1);
    }

    #[tokio::test]
    async fn test_background_failure_is_not_fatal() {
        let (renderer, rasterizer) = renderer(StubLoader {
            fail: true,
            gate: None,
        });
        let response = renderer
            .render(&with_background(), &CoverDimensions::default(), None)
            .await
            .unwrap();

        assert!(!response.background_loaded);
        let plans = rasterizer.plans.lock().unwrap();
        assert!(!plans[0].1);
        assert!(plans[0].0.title.is_some());
    }

    #[tokio::test]
    async fn test_compose_runs_on_blocking_pool() {
        let (renderer, rasterizer) = renderer(StubLoader {
            fail: false,
            gate: None,
        });
        renderer
            .render(&with_background(), &CoverDimensions::default(), None)
            .await
            .unwrap();

        let threads = rasterizer.threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], std::thread::current().id());
    }

    struct PanickingRasterizer {
        measurer: FixedAdvanceMeasurer,
    }

    impl CoverRasterizerPort for PanickingRasterizer {
        fn measurer(&self) -> &dyn TextMeasurer {
            &self.measurer
        }

        fn compose(&self, _plan: &CoverPlan, _background: Option<&DynamicImage>) -> RgbaImage {
            panic!("glyph rasterizer overflow");
        }
    }

    #[tokio::test]
    async fn test_compose_panic_becomes_internal_error() {
        let renderer = CoverRenderer::new(
            Arc::new(StubLoader {
                fail: true,
                gate: None,
            }),
            Arc::new(PanickingRasterizer {
                measurer: FixedAdvanceMeasurer { advance: 0.5 },
            }),
        );

        let err = renderer
            .render(&with_background(), &CoverDimensions::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_invalid_dimensions_rejected() {
        let (renderer, _) = renderer(StubLoader {
            fail: false,
            gate: None,
        });
        let handler = PreviewCoverHandler::new(
            renderer,
            Arc::new(RenderSupervisor::new()),
            CoverRenderSettings {
                max_pixels: 1_000,
                ..CoverRenderSettings::default()
            },
        );

        let err = handler
            .handle(PreviewCover {
                profile_id: ProfileId::new(),
                configuration: CoverConfiguration::default(),
                width: None,
                height: None,
                scale: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = handler
            .handle(PreviewCover {
                profile_id: ProfileId::new(),
                configuration: CoverConfiguration::default(),
                width: Some(0.0),
                height: None,
                scale: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_superseded_preview_is_discarded() {
        let gate = Arc::new(Notify::new());
        let (renderer, rasterizer) = renderer(StubLoader {
            fail: false,
            gate: Some(gate.clone()),
        });
        let supervisor = Arc::new(RenderSupervisor::new());
        let handler = Arc::new(PreviewCoverHandler::new(
            renderer,
            supervisor.clone(),
            CoverRenderSettings::default(),
        ));
        let profile_id = ProfileId::new();

        let slow = {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .handle(PreviewCover {
                        profile_id,
                        configuration: with_background(),
                        width: None,
                        height: None,
                        scale: None,
                    })
                    .await
            })
        };

        // 等待第一次预览领取令牌后再开始第二次
        while supervisor.tracked_keys() == 0 {
            tokio::task::yield_now().await;
        }
        let newer = supervisor.begin(profile_id.to_string());

        gate.notify_one();
        let result = slow.await.unwrap();
        assert!(matches!(result, Err(ApplicationError::Superseded { .. })));
        assert!(rasterizer.plans.lock().unwrap().is_empty());
        assert!(supervisor.is_current(&newer));
    }
}
