//! # ComfyUI 桥接工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            宿主 / 前端（插件面板、CLI）                  │
//! │                                                          │
//! │   “发送” 按钮 ─────── “测试连接” 按钮 ─── 地址输入框      │
//! └───────┬──────────────────────┬──────────────┬────────────┘
//!         ↓                      ↓              ↓
//! ┌───────┼──────────────────────┼──────────────┼────────────┐
//! │       ↓            后端 (Rust)              ↓            │
//! │                                                          │
//! │  ┌─ bridge ───── BridgeService → ImageSubmissionClient   │
//! │  │                 POST /send_image · GET /status        │
//! │  │                                                       │
//! │  ├─ export ───── DocumentSource（活动文档 → PNG）         │
//! │  ├─ endpoint ─── 端口 / URL → 基础地址                    │
//! │  ├─ settings ─── 键值存储 + BridgeSettings               │
//! │  └─ error ────── AppError（结果值之外的失败）             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`bridge`] | 发送图片、测试连接、错误归类、状态渲染 |
//! | [`endpoint`] | 把端口号或 URL 规范化为基础地址 |
//! | [`export`] | 活动文档查询与 PNG 导出 |
//! | [`settings`] | 设置键值存储与插件设置记录 |
//! | [`error`] | 统一错误类型 `AppError` |

pub mod bridge;
pub mod endpoint;
pub mod error;
pub mod export;
pub mod settings;
