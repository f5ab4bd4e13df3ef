//! HTTP Image Loader - 下载并解码封面背景图
//!
//! 实现 ImageLoaderPort trait

use async_trait::async_trait;
use image::{DynamicImage, ImageError, ImageReader, Limits};
use reqwest::Client;
use std::io::Cursor;
use std::time::Duration;

use crate::application::ports::{ImageLoadError, ImageLoaderPort};

/// HTTP 图片加载器配置
#[derive(Debug, Clone)]
pub struct HttpImageLoaderConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 最大下载字节数
    pub max_bytes: usize,
    /// 解码后的最大宽/高（像素）
    pub max_dimension: u32,
    /// 解码器最大内存分配（字节）
    pub max_decode_bytes: u64,
}

impl Default for HttpImageLoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_bytes: 10 * 1024 * 1024,
            max_dimension: 8192,
            max_decode_bytes: 256 * 1024 * 1024,
        }
    }
}

impl HttpImageLoaderConfig {
    fn decode_limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);
        limits.max_alloc = Some(self.max_decode_bytes);
        limits
    }
}

/// 带尺寸与内存上限的解码，压缩炸弹在分配前被拒绝
fn decode_with_limits(bytes: &[u8], limits: Limits) -> Result<DynamicImage, ImageLoadError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageLoadError::DecodeError(e.to_string()))?;
    reader.limits(limits);

    reader.decode().map_err(|e| match e {
        ImageError::Limits(limit) => ImageLoadError::DimensionsExceeded(limit.to_string()),
        other => ImageLoadError::DecodeError(other.to_string()),
    })
}

/// HTTP 图片加载器
pub struct HttpImageLoader {
    client: Client,
    config: HttpImageLoaderConfig,
}

impl HttpImageLoader {
    pub fn new(config: HttpImageLoaderConfig) -> Result<Self, ImageLoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageLoadError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn check_size(&self, size: usize) -> Result<(), ImageLoadError> {
        if size > self.config.max_bytes {
            return Err(ImageLoadError::TooLarge {
                size,
                limit: self.config.max_bytes,
            });
        }
        Ok(())
    }
}

fn validate_url(url: &str) -> Result<reqwest::Url, ImageLoadError> {
    let parsed =
        reqwest::Url::parse(url.trim()).map_err(|_| ImageLoadError::InvalidUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ImageLoadError::InvalidUrl(url.to_string())),
    }
}

#[async_trait]
impl ImageLoaderPort for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<DynamicImage, ImageLoadError> {
        let parsed = validate_url(url)?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                ImageLoadError::Timeout
            } else {
                ImageLoadError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::Status(status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            self.check_size(length as usize)?;
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ImageLoadError::Timeout
            } else {
                ImageLoadError::NetworkError(e.to_string())
            }
        })?;
        self.check_size(bytes.len())?;

        let size = bytes.len();
        let limits = self.config.decode_limits();
        let image = tokio::task::spawn_blocking(move || decode_with_limits(&bytes, limits))
            .await
            .map_err(|e| ImageLoadError::DecodeError(e.to_string()))??;

        tracing::debug!(
            url = %url,
            bytes = size,
            width = image.width(),
            height = image.height(),
            "Background image loaded"
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, routing::get, Router};
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    async fn serve() -> String {
        let png = png_bytes();
        let app = Router::new()
            .route(
                "/bg.png",
                get(move || {
                    let png = png.clone();
                    async move { ([(header::CONTENT_TYPE, "image/png")], png) }
                }),
            )
            .route("/garbage", get(|| async { "not an image" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_config_default() {
        let config = HttpImageLoaderConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_dimension, 8192);
    }

    #[test]
    fn test_decode_rejects_oversized_dimensions() {
        // 1 x 20000 的单色 PNG 压缩后只有几十字节
        let tall = RgbaImage::from_pixel(1, 20_000, Rgba([0, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        tall.write_to(&mut out, ImageFormat::Png).unwrap();
        let bytes = out.into_inner();
        assert!(bytes.len() < 10 * 1024);

        let config = HttpImageLoaderConfig::default();
        assert!(matches!(
            decode_with_limits(&bytes, config.decode_limits()),
            Err(ImageLoadError::DimensionsExceeded(_))
        ));

        let relaxed = HttpImageLoaderConfig {
            max_dimension: 20_000,
            ..HttpImageLoaderConfig::default()
        };
        let image = decode_with_limits(&bytes, relaxed.decode_limits()).unwrap();
        assert_eq!((image.width(), image.height()), (1, 20_000));
    }

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        let loader = HttpImageLoader::new(HttpImageLoaderConfig::default()).unwrap();
        assert!(matches!(
            loader.load("file:///etc/passwd").await,
            Err(ImageLoadError::InvalidUrl(_))
        ));
        assert!(matches!(
            loader.load("not a url").await,
            Err(ImageLoadError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_loads_and_decodes() {
        let base = serve().await;
        let loader = HttpImageLoader::new(HttpImageLoaderConfig::default()).unwrap();

        let image = loader.load(&format!("{}/bg.png", base)).await.unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));

        assert!(matches!(
            loader.load(&format!("{}/garbage", base)).await,
            Err(ImageLoadError::DecodeError(_))
        ));
        assert!(matches!(
            loader.load(&format!("{}/missing.png", base)).await,
            Err(ImageLoadError::Status(404))
        ));
    }

    #[tokio::test]
    async fn test_enforces_byte_limit() {
        let base = serve().await;
        let loader = HttpImageLoader::new(HttpImageLoaderConfig {
            timeout_secs: 5,
            max_bytes: 8,
            ..HttpImageLoaderConfig::default()
        })
        .unwrap();

        assert!(matches!(
            loader.load(&format!("{}/bg.png", base)).await,
            Err(ImageLoadError::TooLarge { limit: 8, .. })
        ));
    }
}
