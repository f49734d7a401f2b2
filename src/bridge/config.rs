//! # 配置模块
//!
//! ## 设计思路
//!
//! 桥接客户端可调的东西很少：插件变体、请求标识、是否走系统代理。
//! 超时刻意不暴露，沿用 HTTP 传输层默认值；每次发送只尝试一次，也没有重试参数。

use crate::endpoint::BridgeVariant;

/// 桥接配置。
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// 插件变体（决定设置字段与默认标签）。
    pub variant: BridgeVariant,
    /// 请求头 `User-Agent`。
    pub user_agent: String,
    /// 是否读取系统代理环境变量（`HTTP_PROXY` 等）。
    pub use_system_proxy: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            variant: BridgeVariant::default(),
            user_agent: format!("comfyui-bridge/{}", env!("CARGO_PKG_VERSION")),
            use_system_proxy: true,
        }
    }
}

impl BridgeConfig {
    pub fn for_variant(variant: BridgeVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }
}
