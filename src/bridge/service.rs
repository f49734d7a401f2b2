//! # 服务层
//!
//! ## 设计思路
//!
//! `BridgeService` 对应插件界面上的两个按钮：“发送”与“测试连接”。
//! 设置作为参数显式传入，每次调用都重新解析地址，不读取任何全局状态。
//!
//! ## 实现思路
//!
//! 发送链路固定为：
//! 1. 检查活动文档（失败即返回，不发起网络请求）
//! 2. 按导出目标选择标签
//! 3. 导出 PNG
//! 4. 读取导出结果，构建请求
//! 5. 解析地址并提交
//!
//! 记录 `export/submit/total` 阶段耗时，便于诊断。

use std::time::Instant;

use super::client::ImageSubmissionClient;
use super::error::BridgeError;
use super::outcome::{ConnectionStatus, SubmissionResult};
use super::payload::ImagePayload;
use super::status::SendStage;
use super::BridgeConfig;
use crate::endpoint::BridgeVariant;
use crate::error::AppError;
use crate::export::{DocumentInfo, DocumentSource, ExportTarget};
use crate::settings::BridgeSettings;

/// 没有活动文档时的提示。
pub const NO_ACTIVE_DOCUMENT: &str = "No active document. Please open an image first.";

/// 桥接服务。
#[derive(Debug, Clone)]
pub struct BridgeService {
    client: ImageSubmissionClient,
    config: BridgeConfig,
}

impl BridgeService {
    /// 使用默认配置创建服务。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use comfyui_bridge::bridge::BridgeService;
    ///
    /// let service = BridgeService::new()?;
    /// # Ok::<(), comfyui_bridge::error::AppError>(())
    /// ```
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Result<Self, AppError> {
        let client = ImageSubmissionClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 导出活动文档并发送。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use comfyui_bridge::bridge::BridgeService;
    /// use comfyui_bridge::export::{ExportTarget, FileDocumentSource};
    /// use comfyui_bridge::settings::BridgeSettings;
    /// use comfyui_bridge::endpoint::BridgeVariant;
    ///
    /// # async fn demo() -> Result<(), comfyui_bridge::error::AppError> {
    /// let service = BridgeService::new()?;
    /// let settings = BridgeSettings::default_for(BridgeVariant::RunPod);
    /// let source = FileDocumentSource::new("canvas.png");
    /// let result = service
    ///     .send_active_document(&settings, &source, ExportTarget::Layer)
    ///     .await;
    /// println!("{:?}", result);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_active_document<D>(
        &self,
        settings: &BridgeSettings,
        source: &D,
        target: ExportTarget,
    ) -> SubmissionResult
    where
        D: DocumentSource + ?Sized,
    {
        self.send_active_document_with_progress(settings, source, target, |_| {})
            .await
    }

    /// 同 `send_active_document`，每进入一个阶段回调一次 `on_stage`。
    pub async fn send_active_document_with_progress<D, P>(
        &self,
        settings: &BridgeSettings,
        source: &D,
        target: ExportTarget,
        on_stage: P,
    ) -> SubmissionResult
    where
        D: DocumentSource + ?Sized,
        P: Fn(SendStage),
    {
        let total_start = Instant::now();

        on_stage(SendStage::CheckingDocument);
        let Some(document) = source.active_document() else {
            log::warn!("⚠️ 没有活动文档，取消发送");
            return Err::<String, _>(BridgeError::Precondition(NO_ACTIVE_DOCUMENT.to_string()))
                .into();
        };
        let label = choose_label(&document, target, self.config.variant);

        on_stage(SendStage::Exporting);
        let export_start = Instant::now();
        let bytes = match source.export_png(&document) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("❌ 导出失败 - {}: {}", document.name, err);
                return Err::<String, _>(err).into();
            }
        };
        let export_elapsed = export_start.elapsed();

        on_stage(SendStage::ReadingFile);
        log::debug!("📄 已读取导出结果 - {}: {} bytes", document.name, bytes.len());
        let payload = ImagePayload::new(bytes, label);

        on_stage(SendStage::Sending);
        let submit_start = Instant::now();
        let endpoint = settings.endpoint();
        let result = self.client.submit(&endpoint, payload).await;
        let submit_elapsed = submit_start.elapsed();

        log::info!(
            "发送流程结束 - success={} export={}ms submit={}ms total={}ms",
            result.is_success(),
            export_elapsed.as_millis(),
            submit_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        result
    }

    /// 直接提交已准备好的图片。
    pub async fn submit(&self, settings: &BridgeSettings, payload: ImagePayload) -> SubmissionResult {
        self.client.submit(&settings.endpoint(), payload).await
    }

    /// 测试连接。
    pub async fn test_connection(&self, settings: &BridgeSettings) -> ConnectionStatus {
        let endpoint = settings.endpoint();
        log::info!("🔌 测试连接 → {}", endpoint);
        self.client.check_status(&endpoint).await
    }
}

/// 图层目标优先使用活动图层名；文档目标使用文档名。
fn choose_label(document: &DocumentInfo, target: ExportTarget, variant: BridgeVariant) -> String {
    match target {
        ExportTarget::Layer => document
            .active_layer
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| variant.fallback_label(&document.name)),
        ExportTarget::Document => document.name.clone(),
    }
}
