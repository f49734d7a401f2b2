//! # 请求体模型
//!
//! ## 设计思路
//!
//! `ImagePayload` 是调用方交给客户端的一次性数据（字节 + 标签 + 可选时间戳）；
//! `SendImageRequest` 是实际上线的 JSON 结构。两者分开，保证字节在构建请求体后即可丢弃。

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// 一次发送的图片数据。
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// 原始图片字节（通常为 PNG）。
    pub bytes: Vec<u8>,
    /// 来源图层 / 文档名称。
    pub label: String,
    /// 提交时间；缺省时在发送时生成。
    pub timestamp: Option<DateTime<Utc>>,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, label: impl Into<String>) -> Self {
        Self {
            bytes,
            label: label.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// 构建上线请求体，消耗 payload。
    pub(crate) fn into_request(self) -> SendImageRequest {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        SendImageRequest {
            image_data: encode_image_data(&self.bytes),
            layer_name: self.label,
            timestamp: format_timestamp(timestamp),
        }
    }
}

/// `POST /send_image` 的 JSON 请求体。
#[derive(Debug, Serialize)]
pub(crate) struct SendImageRequest {
    pub(crate) image_data: String,
    pub(crate) layer_name: String,
    pub(crate) timestamp: String,
}

/// 标准 base64 字母表，带填充，不换行。
pub fn encode_image_data(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// ISO-8601，UTC，毫秒精度，`Z` 结尾。
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
