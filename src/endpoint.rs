//! # 服务端地址解析模块
//!
//! ## 设计思路
//!
//! 把用户输入的原始配置（端口号或完整 URL）转换为可直接拼接路径的基础地址。
//! 本地版（固定端口）与 RunPod 版（自由 URL）共用同一套解析规则，
//! 仅通过 `BridgeVariant` 区分持久化字段与默认值。
//!
//! ## 实现思路
//!
//! - 纯正整数 → 视为端口，拼成 `http://localhost:<port>`。
//! - 其他 → 视为完整 URL，仅去掉一个结尾 `/`。
//! - 空输入 → 回退 `http://localhost:8190`。
//! - 不做进一步校验：格式错误的 URL 会在请求阶段以网络错误暴露。

use std::fmt;

/// 未配置时使用的默认端口。
pub const DEFAULT_PORT: u16 = 8190;

/// 未配置时使用的默认地址。
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8190";

/// 插件变体：决定设置字段名与默认配置文本。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeVariant {
    /// 本机 ComfyUI，仅配置端口。
    Classic,
    /// 远程实例（如 RunPod），配置完整 URL。
    #[default]
    RunPod,
}

impl BridgeVariant {
    /// 设置记录中保存地址配置的字段名。
    pub fn settings_field(self) -> &'static str {
        match self {
            Self::Classic => "comfyuiPort",
            Self::RunPod => "comfyuiUrl",
        }
    }

    /// 该变体在没有任何设置时的原始配置。
    pub fn default_config(self) -> String {
        match self {
            Self::Classic => DEFAULT_PORT.to_string(),
            Self::RunPod => DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// 导出目标为“图层”但没有活动图层时使用的标签。
    pub(crate) fn fallback_label(self, document_name: &str) -> String {
        match self {
            Self::Classic => "Document".to_string(),
            Self::RunPod => document_name.to_string(),
        }
    }
}

/// 规范化后的服务端基础地址（无结尾 `/`，永不为空）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    /// 从原始配置解析地址。
    ///
    /// # 示例
    /// ```rust
    /// use comfyui_bridge::endpoint::Endpoint;
    ///
    /// assert_eq!(Endpoint::resolve(Some("8188")).as_str(), "http://localhost:8188");
    /// assert_eq!(Endpoint::resolve(Some("https://pod.example/")).as_str(), "https://pod.example");
    /// assert_eq!(Endpoint::resolve(None).as_str(), "http://localhost:8190");
    /// ```
    pub fn resolve(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Self::default();
        }

        if let Some(port) = positive_integer_digits(trimmed) {
            return Self(format!("http://localhost:{}", port));
        }

        let url = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if url.is_empty() {
            return Self::default();
        }

        Self(url.to_string())
    }

    /// 直接由端口构造本机地址。
    pub fn from_port(port: u16) -> Self {
        Self(format!("http://localhost:{}", port))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 拼接接口路径，`path` 以 `/` 开头。
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(DEFAULT_ENDPOINT.to_string())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 纯数字（不带符号、不带空白）且大于 0 时返回去掉前导零的数字串。
/// 不做数值解析，任意长度的正整数都按端口处理。
fn positive_integer_digits(input: &str) -> Option<&str> {
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = input.trim_start_matches('0');
    (!digits.is_empty()).then_some(digits)
}
