//! # 图片提交客户端
//!
//! ## 设计思路
//!
//! 客户端只做两件事：`submit`（POST `/send_image`）与 `check_status`（GET `/status`），
//! 并把所有结果归类为四种 `ErrorKind` 之一。单次请求，不重试，不缓存地址。
//!
//! ## 实现思路
//!
//! - 内部以 `Result<_, BridgeError>` 编写流程，`?` 传播，边界处统一转换为结果值。
//! - 非 2xx 时“尽力”读取响应体作为诊断文本，读取失败直接忽略。
//! - `check_status` 容忍非 JSON 响应体（视为空对象）；`submit` 不容忍（协议错误）。
//! - 内部持有一个 `reqwest::Client`，其本身线程安全，可并发调用两个操作。

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Map, Value};

use super::error::BridgeError;
use super::outcome::{ConnectionStatus, DEFAULT_STATUS_TEXT, MISSING_IMAGE_ID, SubmissionResult};
use super::payload::ImagePayload;
use super::BridgeConfig;
use crate::endpoint::Endpoint;
use crate::error::AppError;

const SEND_IMAGE_PATH: &str = "/send_image";
const STATUS_PATH: &str = "/status";
const JSON_MIME: &str = "application/json";

/// 图片提交客户端。
#[derive(Debug, Clone)]
pub struct ImageSubmissionClient {
    http_client: reqwest::Client,
}

impl ImageSubmissionClient {
    /// 根据配置创建客户端。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use comfyui_bridge::bridge::{BridgeConfig, ImagePayload, ImageSubmissionClient};
    /// use comfyui_bridge::endpoint::Endpoint;
    ///
    /// # async fn demo() -> Result<(), comfyui_bridge::error::AppError> {
    /// let client = ImageSubmissionClient::new(&BridgeConfig::default())?;
    /// let endpoint = Endpoint::resolve(Some("8190"));
    /// let result = client
    ///     .submit(&endpoint, ImagePayload::new(vec![0x89, 0x50, 0x4E, 0x47], "Layer 1"))
    ///     .await;
    /// println!("{:?}", result);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &BridgeConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http_client = builder
            .build()
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// 提交一张图片，返回服务端分配的图片 ID 或分类后的失败。
    pub async fn submit(&self, endpoint: &Endpoint, payload: ImagePayload) -> SubmissionResult {
        let label = payload.label.clone();
        let result = self.try_submit(endpoint, payload).await;

        match &result {
            Ok(image_id) => log::info!("✅ 图片已发送 - 标签: {}, image_id: {}", label, image_id),
            Err(err) => log::warn!(
                "❌ 图片发送失败 - 标签: {}, 分类: {}, 原因: {}",
                label,
                err.kind().code(),
                err
            ),
        }

        result.into()
    }

    /// 查询服务端状态，用于“测试连接”。
    pub async fn check_status(&self, endpoint: &Endpoint) -> ConnectionStatus {
        let result = self.try_check_status(endpoint).await;

        match &result {
            Ok((status, count)) => log::info!(
                "✅ 连接正常 - {}: status={}, received={:?}",
                endpoint,
                status,
                count
            ),
            Err(err) => log::warn!(
                "❌ 连接测试失败 - {}: 分类: {}, 原因: {}",
                endpoint,
                err.kind().code(),
                err
            ),
        }

        result.into()
    }

    async fn try_submit(
        &self,
        endpoint: &Endpoint,
        payload: ImagePayload,
    ) -> Result<String, BridgeError> {
        let url = endpoint.join(SEND_IMAGE_PATH);
        let byte_len = payload.bytes.len();
        let body = serde_json::to_vec(&payload.into_request())
            .map_err(|e| BridgeError::Protocol(format!("Failed to encode request body: {}", e)))?;

        log::info!("📤 发送图片 - {} bytes（请求体 {} bytes）→ {}", byte_len, body.len(), url);

        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, JSON_MIME)
            .body(body)
            .send()
            .await
            .map_err(|e| BridgeError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.ok();
            return Err(BridgeError::server(status.as_u16(), text.as_deref()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::from_reqwest(&e))?;
        let parsed = serde_json::from_str::<Value>(&text)
            .map_err(|e| BridgeError::Protocol(e.to_string()))?;

        Ok(extract_image_id(&parsed))
    }

    async fn try_check_status(
        &self,
        endpoint: &Endpoint,
    ) -> Result<(String, Option<u64>), BridgeError> {
        let url = endpoint.join(STATUS_PATH);
        log::debug!("📡 查询服务端状态 → {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, JSON_MIME)
            .send()
            .await
            .map_err(|e| BridgeError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.ok();
            return Err(BridgeError::server(status.as_u16(), text.as_deref()));
        }

        let parsed = match response.text().await {
            Ok(text) => serde_json::from_str::<Value>(&text).unwrap_or_else(|e| {
                log::debug!("状态响应不是 JSON，按空对象处理: {e}");
                Value::Object(Map::new())
            }),
            Err(e) => {
                log::debug!("状态响应体读取失败，按空对象处理: {e}");
                Value::Object(Map::new())
            }
        };

        Ok(extract_status(&parsed))
    }
}

/// 缺失、为空或为 `null` 时返回展示文本 `N/A`；数字按文本返回。
fn extract_image_id(body: &Value) -> String {
    match body.get("image_id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => MISSING_IMAGE_ID.to_string(),
    }
}

/// 非空字符串、非零数字与 `true` 按文本展示，其余回退 `running`。
fn extract_status(body: &Value) -> (String, Option<u64>) {
    let status_text = match body.get("status") {
        Some(Value::String(status)) if !status.is_empty() => status.clone(),
        Some(Value::Number(status)) if status.as_f64() != Some(0.0) => status.to_string(),
        Some(Value::Bool(true)) => true.to_string(),
        _ => DEFAULT_STATUS_TEXT.to_string(),
    };
    let received_count = body.get("received_images_count").and_then(Value::as_u64);
    (status_text, received_count)
}
