//! # 状态文案渲染
//!
//! 把结果值渲染为界面可直接展示的一行（或多行）状态文本。
//! 渲染与发送解耦：服务层只返回结果值，UI 层自行决定如何展示。

use crate::endpoint::Endpoint;

use super::outcome::{ConnectionStatus, SubmissionResult};

/// 状态级别，对应界面上的 info / success / error 样式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// 一条可展示的状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

/// 发送流程的阶段，用于进度提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStage {
    CheckingDocument,
    Exporting,
    ReadingFile,
    Sending,
}

impl SendStage {
    pub fn status_line(self) -> StatusLine {
        let text = match self {
            Self::CheckingDocument => "Checking document...",
            Self::Exporting => "Exporting image...",
            Self::ReadingFile => "Reading file...",
            Self::Sending => "Sending to ComfyUI...",
        };
        StatusLine::info(text)
    }
}

pub fn render_submission(result: &SubmissionResult) -> StatusLine {
    match result {
        SubmissionResult::Success { server_image_id } => StatusLine::success(format!(
            "✓ Sent successfully! Image ID: {}",
            server_image_id
        )),
        SubmissionResult::Failure { message, .. } => {
            StatusLine::error(format!("✗ Error: {}", message))
        }
    }
}

pub fn render_connection(status: &ConnectionStatus, endpoint: &Endpoint) -> StatusLine {
    match status {
        ConnectionStatus::Success {
            status_text,
            received_count,
        } => {
            let mut text = format!("✓ Connected! Status: {}", status_text);
            if let Some(count) = received_count {
                text.push_str(&format!("\nReceived images: {}", count));
            }
            text.push_str(&format!("\nReachable at: {}", endpoint));
            StatusLine::success(text)
        }
        ConnectionStatus::Failure { message, .. } => {
            StatusLine::error(format!("✗ Connection failed: {}", message))
        }
    }
}
