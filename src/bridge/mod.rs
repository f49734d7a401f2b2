//! # 桥接模块（bridge）
//!
//! ## 设计思路
//!
//! 该模块把“导出文档 → 构建请求体 → 提交到图片服务端 → 归类结果 → 渲染状态”
//! 按职责拆分为多个子模块：
//!
//! - `client`：`submit` / `check_status` 两个网络操作与结果归类
//! - `service`：组合设置、文档来源与客户端，对应界面上的两个按钮
//! - `status`：把结果值渲染为状态文本
//! - `payload`：请求体模型与 base64 / 时间戳编码
//! - `config/error/outcome`：配置、错误分类、结果模型
//!
//! ## 调用链
//!
//! ```text
//! UI / CLI
//!    ↓
//! service.rs（活动文档检查 + 标签选择 + 导出）
//!    ↓
//! client.rs（单次 HTTP 请求 + 错误归类）
//!    ↓
//! SubmissionResult / ConnectionStatus
//!    ↓
//! status.rs（渲染为 StatusLine）
//! ```

mod client;
mod config;
mod error;
mod outcome;
mod payload;
mod service;
mod status;

pub use client::ImageSubmissionClient;
pub use config::BridgeConfig;
pub use error::{BridgeError, ErrorKind, NETWORK_HINT};
pub use outcome::{ConnectionStatus, SubmissionResult, DEFAULT_STATUS_TEXT, MISSING_IMAGE_ID};
pub use payload::{ImagePayload, encode_image_data, format_timestamp};
pub use service::{BridgeService, NO_ACTIVE_DOCUMENT};
pub use status::{SendStage, StatusLevel, StatusLine, render_connection, render_submission};
