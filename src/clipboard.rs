//! 剪贴板快照采集模块
//!
//! # 设计思路
//!
//! 一次性抓取系统剪贴板的全部表示形式，填充为 [`ClipboardBundle`] 交给
//! 调度器。核心逻辑从不直接读剪贴板：快照采集被隔离在这里，失败的
//! 表示形式按"不存在"处理，采集本身只在剪贴板完全打不开时才报错。
//!
//! # 实现思路
//!
//! - 文本与位图通过 `arboard` 读取，跨平台。
//! - 文件列表（CF_HDROP）与富文本片段（注册格式 "HTML Format"）是
//!   Windows 专属的剪贴板槽位，通过 `windows` crate 直接读取；
//!   非 Windows 平台返回空占位。

use crate::bundle::{BitmapData, ClipboardBundle};
use crate::error::AppError;
use std::path::PathBuf;

/// 抓取当前剪贴板内容的一次性快照。
///
/// 各表示形式独立读取：任一形式缺失或读取失败都不影响其余形式。
pub fn capture_bundle() -> Result<ClipboardBundle, AppError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;

    let text = clipboard.get_text().ok().filter(|t| !t.is_empty());
    let bitmap = clipboard.get_image().ok().map(|img| BitmapData {
        width: img.width,
        height: img.height,
        rgba: img.bytes.into_owned(),
    });

    let files = read_clipboard_file_list();
    let markup = read_clipboard_markup();

    log::debug!(
        "📋 快照采集完成 - 文件: {} 文本: {} 标记: {} 位图: {}",
        files.len(),
        text.is_some(),
        markup.is_some(),
        bitmap.is_some()
    );

    Ok(ClipboardBundle {
        files,
        text,
        markup,
        bitmap,
    })
}

/// 读取剪贴板中的文件列表（CF_HDROP，Windows 专用）。
///
/// 用户在资源管理器中复制文件时，剪贴板中包含 CF_HDROP 数据。
#[cfg(target_os = "windows")]
fn read_clipboard_file_list() -> Vec<PathBuf> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use windows::Win32::System::DataExchange::{CloseClipboard, GetClipboardData, OpenClipboard};
    use windows::Win32::System::Ole::CF_HDROP;
    use windows::Win32::UI::Shell::{DragQueryFileW, HDROP};

    unsafe {
        if OpenClipboard(None).is_err() {
            return Vec::new();
        }

        let files = (|| -> Vec<PathBuf> {
            let handle = match GetClipboardData(CF_HDROP.0 as u32) {
                Ok(h) => h,
                Err(_) => return Vec::new(),
            };

            let hdrop = HDROP(handle.0);
            let count = DragQueryFileW(hdrop, 0xFFFFFFFF, None);
            let mut files = Vec::with_capacity(count as usize);

            for i in 0..count {
                let len = DragQueryFileW(hdrop, i, None);
                if len == 0 {
                    continue;
                }

                let mut buf = vec![0u16; (len + 1) as usize];
                DragQueryFileW(hdrop, i, Some(&mut buf));

                if let Some(pos) = buf.iter().position(|&c| c == 0) {
                    buf.truncate(pos);
                }

                files.push(PathBuf::from(OsString::from_wide(&buf)));
            }

            if !files.is_empty() {
                log::info!("📁 从剪贴板读取到 {} 个文件", files.len());
            }
            files
        })();

        let _ = CloseClipboard();
        files
    }
}

/// 非 Windows 平台的占位实现
#[cfg(not(target_os = "windows"))]
fn read_clipboard_file_list() -> Vec<PathBuf> {
    Vec::new()
}

/// 读取剪贴板中的富文本片段（注册格式 "HTML Format"，Windows 专用）。
///
/// 浏览器复制内容时会同时放入该槽位，载荷为 UTF-8 字节（CF_HTML 约定，
/// 含 StartHTML/EndHTML 头部，`src=` 属性只会出现在正文里，无需剥离）。
#[cfg(target_os = "windows")]
fn read_clipboard_markup() -> Option<String> {
    use windows::Win32::Foundation::HGLOBAL;
    use windows::Win32::System::DataExchange::{
        CloseClipboard, GetClipboardData, OpenClipboard, RegisterClipboardFormatW,
    };
    use windows::Win32::System::Memory::{GlobalLock, GlobalSize, GlobalUnlock};
    use windows::core::w;

    unsafe {
        let format = RegisterClipboardFormatW(w!("HTML Format"));
        if format == 0 {
            return None;
        }

        if OpenClipboard(None).is_err() {
            return None;
        }

        let markup = (|| -> Option<String> {
            let handle = GetClipboardData(format).ok()?;
            let hglobal = HGLOBAL(handle.0);

            let ptr = GlobalLock(hglobal) as *const u8;
            if ptr.is_null() {
                return None;
            }

            let size = GlobalSize(hglobal);
            let bytes = std::slice::from_raw_parts(ptr, size).to_vec();
            let _ = GlobalUnlock(hglobal);

            let payload = payload_to_string(&bytes);
            if payload.is_empty() { None } else { Some(payload) }
        })();

        let _ = CloseClipboard();
        markup
    }
}

/// 非 Windows 平台的占位实现
#[cfg(not(target_os = "windows"))]
fn read_clipboard_markup() -> Option<String> {
    None
}

/// 把剪贴板全局内存里的字节转为字符串：截断 NUL 结尾，按 UTF-8 宽松解码。
#[allow(dead_code)]
fn payload_to_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
