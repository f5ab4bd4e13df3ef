//! Image Loader Adapter - 背景图下载与解码

mod http_image_loader;

pub use http_image_loader::*;
