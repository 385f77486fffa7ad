//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)` 等不一致模式。
//! 每个变体对应一类失败：只有 `TargetDir` 会让整次粘贴提前终止，
//! 其余错误都被调度器限制在单个条目内（记日志、跳过、继续）。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 与 `FetchError` 提供 `From` 转换，无需手动 map。

use crate::fetch::FetchError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 目标目录不存在或不是目录（整次调用的前置条件，致命）
    #[error("目标目录不可用：{0}")]
    TargetDir(String),

    /// 剪贴板读取失败
    #[error("剪贴板操作失败：{0}")]
    Clipboard(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误：{0}")]
    Io(#[from] std::io::Error),

    /// 内嵌图片数据解码失败（单个图片级别，调用方跳过该图片）
    #[error("内嵌数据解码失败：{0}")]
    Decode(String),

    /// 网络下载失败（单个 URL 级别，调用方降级处理）
    #[error("{0}")]
    Fetch(#[from] FetchError),
}
