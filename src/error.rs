//! 统一错误类型模块
//!
//! # 设计思路
//!
//! `AppError` 只承载“结果值之外”的失败：设置文件读写、设置序列化、HTTP 客户端构建。
//! 一次发送 / 连接测试的失败不走这里，而是由 `bridge` 模块转换成
//! `SubmissionResult` / `ConnectionStatus` 中的失败分支返回给调用方。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 与 `serde_json::Error` 提供 `From` 转换，无需手动 map。

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 设置存储不可用或内容无法解析
    #[error("设置存储错误: {0}")]
    Settings(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化 / 反序列化失败
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP 客户端初始化失败
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(String),
}
