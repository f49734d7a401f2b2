//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 一次发送 / 连接测试中所有可能的失败都归入四类 `ErrorKind`，
//! 由 `BridgeError` 承载具体消息。客户端边界处再转换为结果值，
//! 因此调用方永远拿到的是“可渲染的失败”，而不是向上冒泡的错误。
//!
//! ## 实现思路
//!
//! - `BridgeError::server` 统一生成 `Server responded with <status>[: <body>]`。
//! - `BridgeError::from_reqwest` 拼接完整错误链，并在命中网络故障特征时追加排查提示。
//! - 网络故障特征使用 `RegexSet` 一次性匹配，`Lazy` 首次使用时编译。

use std::error::Error as _;

use once_cell::sync::Lazy;
use regex::RegexSet;

/// 网络错误时附加给用户的排查提示。
pub const NETWORK_HINT: &str = "Cannot reach the image server. Please check:\n\
1. URL is correct\n\
2. ComfyUI is running with the bridge node loaded\n\
3. RunPod instance is active (remote setups)\n\
4. No firewall blocking the connection";

/// 已知的“请求发不出去”类错误文本。
static NETWORK_FAILURE_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)failed to fetch",
        r"(?i)fetch failed",
        r"(?i)network\s?error",
        r"(?i)error sending request",
        r"(?i)connection (refused|reset|closed|aborted)",
        r"(?i)dns error|failed to lookup address|name or service not known",
        r"(?i)timed out",
        r"(?i)tls|certificate|handshake",
        r"(?i)builder error|relative url|invalid (url|domain|port)|url scheme",
    ])
    .expect("网络错误特征正则编译失败")
});

/// 失败分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 发起网络请求前的前置条件不满足（例如没有活动文档）。
    PreconditionError,
    /// 服务端返回非 2xx 状态码。
    ServerError,
    /// 期望 JSON 但响应体无法解析。
    ProtocolError,
    /// 传输层失败（连接拒绝、DNS、超时、TLS 等）。
    NetworkError,
}

impl ErrorKind {
    /// 稳定的错误码字符串，供日志与前端分支使用。
    pub fn code(self) -> &'static str {
        match self {
            Self::PreconditionError => "precondition",
            Self::ServerError => "server",
            Self::ProtocolError => "protocol",
            Self::NetworkError => "network",
        }
    }
}

/// 桥接链路统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("{0}")]
    Precondition(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Protocol(String),

    #[error("{0}")]
    Network(String),
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Precondition(_) => ErrorKind::PreconditionError,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Protocol(_) => ErrorKind::ProtocolError,
            Self::Network(_) => ErrorKind::NetworkError,
        }
    }

    /// 非 2xx 响应。空白响应体不拼接。
    pub fn server(status: u16, body: Option<&str>) -> Self {
        let message = match body.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => format!("Server responded with {}: {}", status, text),
            None => format!("Server responded with {}", status),
        };
        Self::Server { status, message }
    }

    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        let transport_failure = error.is_connect() || error.is_timeout() || error.is_builder();
        Self::network(error_chain_message(error), transport_failure)
    }

    /// 传输层失败。`transport_failure` 为真或命中网络故障特征时追加排查提示。
    fn network(detail: String, transport_failure: bool) -> Self {
        if transport_failure || NETWORK_FAILURE_PATTERNS.is_match(&detail) {
            Self::Network(format!("{}\n\n{}", detail, NETWORK_HINT))
        } else {
            Self::Network(detail)
        }
    }
}

/// reqwest 的 `Display` 只有最外层描述，这里展开整条 source 链。
fn error_chain_message(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
