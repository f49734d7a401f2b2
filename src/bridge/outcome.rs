//! # 结果模型
//!
//! 客户端两个操作的返回值。失败分支只携带分类与可直接展示的消息，
//! 调用方据此渲染界面，不再向上传播错误。

use super::error::{BridgeError, ErrorKind};

/// 服务端未返回图片 ID 时的展示文本（仅用于展示，不是可解析的哨兵值）。
pub const MISSING_IMAGE_ID: &str = "N/A";

/// 未返回状态字段时的默认状态文本。
pub const DEFAULT_STATUS_TEXT: &str = "running";

/// `submit` 的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success { server_image_id: String },
    Failure { kind: ErrorKind, message: String },
}

/// `check_status` 的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Success {
        status_text: String,
        received_count: Option<u64>,
    },
    Failure { kind: ErrorKind, message: String },
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<String, BridgeError>> for SubmissionResult {
    fn from(result: Result<String, BridgeError>) -> Self {
        match result {
            Ok(server_image_id) => Self::Success { server_image_id },
            Err(err) => Self::Failure {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

impl From<Result<(String, Option<u64>), BridgeError>> for ConnectionStatus {
    fn from(result: Result<(String, Option<u64>), BridgeError>) -> Self {
        match result {
            Ok((status_text, received_count)) => Self::Success {
                status_text,
                received_count,
            },
            Err(err) => Self::Failure {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}
