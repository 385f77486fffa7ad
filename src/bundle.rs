//! # 剪贴板快照数据模型
//!
//! ## 设计思路
//!
//! 将"剪贴板上有什么"建模为一个显式传入的快照结构，而不是让核心逻辑
//! 直接去读进程级全局状态。好处是调度器可以用构造出来的快照做确定性测试，
//! 生产路径则由 `clipboard::capture_bundle` 负责填充。
//!
//! 各表示形式彼此独立：同一次复制完全可能同时带有文本、HTML 片段和位图
//! （浏览器复制图片就是典型场景），取舍策略属于调度器，不属于本模块。

use std::path::PathBuf;

/// 一次剪贴板快照：四种表示形式的并集，均为只读。
#[derive(Debug, Clone, Default)]
pub struct ClipboardBundle {
    /// 文件引用列表（资源管理器复制文件时的 CF_HDROP 内容）。
    pub files: Vec<PathBuf>,
    /// 纯文本内容。
    pub text: Option<String>,
    /// 富文本标记片段（Windows 下为注册格式 "HTML Format" 的内容）。
    pub markup: Option<String>,
    /// 原始位图（RGBA8 像素）。
    pub bitmap: Option<BitmapData>,
}

/// 剪贴板位图的像素数据，布局与 `arboard::ImageData` 一致。
#[derive(Debug, Clone)]
pub struct BitmapData {
    /// 宽度（像素）。
    pub width: usize,
    /// 高度（像素）。
    pub height: usize,
    /// RGBA 字节数组（`width * height * 4`）。
    pub rgba: Vec<u8>,
}

impl ClipboardBundle {
    /// 快照是否不含任何可用表示形式。
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
            && self.text.is_none()
            && self.markup.is_none()
            && self.bitmap.is_none()
    }
}
