//! # 文档导出模块
//!
//! ## 设计思路
//!
//! 宿主应用需要提供两种能力：查询当前活动文档、把文档渲染为 PNG 字节。
//! 这里抽象为 `DocumentSource`，桥接服务只依赖该接口，
//! 因此“没有活动文档”可以在任何网络请求之前被发现。
//!
//! ## 实现思路
//!
//! - `FileDocumentSource`：把一个本地图片文件当作活动文档。
//! - 通过文件签名（`infer`）判断格式：PNG 直接透传，其他图片格式用 `image` 重新编码为 PNG。
//! - 非图片内容视为前置条件失败。

use std::io::Cursor;
use std::path::PathBuf;

use image::ImageFormat;

use crate::bridge::BridgeError;

/// 活动文档的描述信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// 文档名称。
    pub name: String,
    /// 当前活动图层名称（宿主不支持图层时为 `None`）。
    pub active_layer: Option<String>,
}

/// 导出目标：决定发送时使用的标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportTarget {
    /// 活动图层（无活动图层时回退到变体默认标签）。
    #[default]
    Layer,
    /// 整个文档。
    Document,
}

/// 宿主文档来源。
pub trait DocumentSource {
    /// 当前活动文档；没有打开的文档时返回 `None`。
    fn active_document(&self) -> Option<DocumentInfo>;

    /// 将文档渲染为 PNG 字节。
    fn export_png(&self, document: &DocumentInfo) -> Result<Vec<u8>, BridgeError>;
}

/// 以本地图片文件作为活动文档。
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    path: PathBuf,
    layer_name: Option<String>,
}

impl FileDocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layer_name: None,
        }
    }

    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = Some(layer_name.into());
        self
    }
}

impl DocumentSource for FileDocumentSource {
    fn active_document(&self) -> Option<DocumentInfo> {
        if !self.path.is_file() {
            return None;
        }

        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());

        Some(DocumentInfo {
            name,
            active_layer: self.layer_name.clone(),
        })
    }

    fn export_png(&self, document: &DocumentInfo) -> Result<Vec<u8>, BridgeError> {
        log::info!("📁 导出文档 - {}（{}）", document.name, self.path.display());

        let bytes = std::fs::read(&self.path).map_err(|e| {
            BridgeError::Precondition(format!(
                "Cannot read document '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        render_png(bytes)
    }
}

/// PNG 原样返回，其他可识别的图片格式重新编码为 PNG。
pub fn render_png(bytes: Vec<u8>) -> Result<Vec<u8>, BridgeError> {
    let kind = infer::get(&bytes)
        .ok_or_else(|| BridgeError::Precondition("Document is not a recognizable image".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(BridgeError::Precondition(format!(
            "Document is not an image: {}",
            kind.mime_type()
        )));
    }

    if kind.mime_type() == "image/png" {
        log::debug!("PNG 直接透传 - {} bytes", bytes.len());
        return Ok(bytes);
    }

    let decoded = image::load_from_memory(&bytes).map_err(|e| {
        BridgeError::Precondition(format!("Cannot decode {}: {}", kind.mime_type(), e))
    })?;

    let mut png = Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| BridgeError::Precondition(format!("Cannot export PNG: {}", e)))?;

    log::debug!(
        "🔄 {} 已转为 PNG - {}x{}, {} bytes",
        kind.mime_type(),
        decoded.width(),
        decoded.height(),
        png.get_ref().len()
    );

    Ok(png.into_inner())
}
