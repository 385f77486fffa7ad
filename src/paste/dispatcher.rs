//! # 内容分类与调度模块
//!
//! ## 设计思路
//!
//! 一次粘贴事件是对快照的一趟固定优先级扫描，终态只有两种：保存了 n 个
//! 文件，或没有任何可用内容。层级顺序即去重策略：很多系统复制图片时
//! 会同时放入标记片段和位图，顺序决定谁生效：
//!
//! 1. 文件引用：逐个复制，只要有一个成功就直接结束（文件独占本次事件）。
//! 2. 文本：先判断是否像可下载 URL，是则交给下载器；下载成功就不再把
//!    同一段文本存成 `.txt`，失败则降级为纯文本保存。
//! 3. 标记片段：提取全部图片引用，内嵌的走解码器、远程的走下载器，
//!    按提取顺序编号，单个失败不影响同批其他图片。
//! 4. 位图兜底：仅当第 3 层一张图片都没保存成功时才落盘。
//!
//! ## 实现思路
//!
//! - 时间戳在入口处计算一次，本次事件所有输出共享。
//! - 除目标目录前置校验外，任何单条目失败都只记日志、跳过、继续。
//! - 保存成功的图片会用文件签名做一次嗅探，仅作诊断日志，不影响结果。

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::bundle::{BitmapData, ClipboardBundle};
use crate::error::AppError;
use crate::fetch::Fetcher;

use super::inline_data;
use super::markup::{self, ImageDescriptor};
use super::naming;
use super::url_rules;

/// 签名嗅探读取的文件头长度。
const SIGNATURE_PROBE_BYTES: u64 = 8192;

/// 一次粘贴事件的终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// 成功落盘的文件数量。
    Saved(usize),
    /// 快照中没有任何可保存的内容，调用方应向用户提示"无可粘贴内容"。
    NothingApplicable,
}

/// 把剪贴板快照的内容保存到目标目录。
///
/// 这是核心入口：快照显式传入而非读取全局状态，下载行为通过 `fetcher`
/// 注入，两者都便于测试替身。目标目录必须已存在，否则返回
/// [`AppError::TargetDir`]，不会尝试创建。
pub fn save_clipboard_content(
    bundle: &ClipboardBundle,
    target_dir: &Path,
    fetcher: &dyn Fetcher,
) -> Result<PasteOutcome, AppError> {
    if !target_dir.is_dir() {
        return Err(AppError::TargetDir(target_dir.display().to_string()));
    }

    let timestamp = naming::paste_timestamp(Local::now());
    log::info!(
        "📋 开始处理粘贴事件 - 目录: {} 时间戳: {}",
        target_dir.display(),
        timestamp
    );

    let mut saved = 0_usize;

    // 第 1 层：文件引用独占本次事件
    let copied = copy_file_references(&bundle.files, target_dir, &timestamp);
    if copied > 0 {
        log::info!("✅ 已复制 {} 个文件，跳过其余表示形式", copied);
        return Ok(PasteOutcome::Saved(copied));
    }

    // 第 2 层：文本（URL 下载优先，失败降级）
    if let Some(text) = bundle.text.as_deref() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            saved += save_text(trimmed, target_dir, fetcher, &timestamp);
        }
    }

    // 第 3 层：标记片段中的图片
    let images_saved = match bundle.markup.as_deref() {
        Some(fragment) => save_markup_images(fragment, target_dir, fetcher, &timestamp),
        None => 0,
    };
    saved += images_saved;

    // 第 4 层：位图兜底，仅当标记片段颗粒无收
    if images_saved == 0 {
        if let Some(bitmap) = &bundle.bitmap {
            saved += save_bitmap_png(bitmap, target_dir, &timestamp);
        }
    }

    if saved == 0 {
        log::info!("ℹ️ 剪贴板中没有可保存的内容");
        Ok(PasteOutcome::NothingApplicable)
    } else {
        Ok(PasteOutcome::Saved(saved))
    }
}

/// 第 1 层：把快照中的文件引用复制进目标目录。
///
/// 源文件已不存在的条目跳过；单个复制失败只记日志，不影响同批其他文件。
fn copy_file_references(files: &[PathBuf], target_dir: &Path, timestamp: &str) -> usize {
    let mut copied = 0_usize;

    for src in files {
        if !src.is_file() {
            log::warn!("⚠️ 源文件已不存在，跳过：{}", src.display());
            continue;
        }

        let Some(name) = src.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        let dest = naming::resolve_target(target_dir, &name, timestamp);
        match fs::copy(src, &dest) {
            Ok(_) => {
                log::info!("📁 已复制 {} -> {}", src.display(), dest.display());
                copied += 1;
            }
            Err(err) => {
                log::warn!("⚠️ 复制 {} 失败：{}", src.display(), err);
            }
        }
    }

    copied
}

/// 第 2 层：文本要么是下载指令，要么按字面内容保存。
fn save_text(trimmed: &str, target_dir: &Path, fetcher: &dyn Fetcher, timestamp: &str) -> usize {
    if url_rules::looks_like_file_url(trimmed) {
        let name = url_rules::filename_from_url(trimmed, timestamp);
        let dest = naming::resolve_target(target_dir, &name, timestamp);

        match fetcher.fetch_quiet(trimmed, &dest) {
            Ok(()) => {
                log::info!("✅ URL 已下载为 {}", dest.display());
                return 1;
            }
            Err(err) => {
                log::warn!("⚠️ URL 下载失败，降级为保存文本：{}", err);
            }
        }
    }

    let dest = naming::resolve_target(target_dir, &format!("Paste_{}.txt", timestamp), timestamp);
    match fs::write(&dest, trimmed) {
        Ok(()) => {
            log::info!("📝 文本已保存为 {}", dest.display());
            1
        }
        Err(err) => {
            // 尽力而为：文本写入失败不影响事件整体结果
            log::warn!("⚠️ 文本保存失败（忽略）：{}", err);
            0
        }
    }
}

/// 第 3 层：按提取顺序物化标记片段中的图片引用。
fn save_markup_images(
    fragment: &str,
    target_dir: &Path,
    fetcher: &dyn Fetcher,
    timestamp: &str,
) -> usize {
    let descriptors = markup::extract_images(fragment);
    let multiple = descriptors.len() > 1;
    let mut saved = 0_usize;

    for (idx, descriptor) in descriptors.iter().enumerate() {
        let name = if multiple {
            format!("Image_{}_{}.png", timestamp, idx + 1)
        } else {
            format!("Image_{}.png", timestamp)
        };
        let dest = naming::resolve_target(target_dir, &name, timestamp);

        let result = match descriptor {
            ImageDescriptor::InlineData(data_uri) => save_inline_image(data_uri, &dest),
            ImageDescriptor::RemoteUrl(url) => {
                fetcher.fetch_quiet(url, &dest).map_err(AppError::from)
            }
        };

        match result {
            Ok(()) => {
                sniff_image_signature(&dest);
                log::info!("🖼️ 图片已保存为 {}", dest.display());
                saved += 1;
            }
            Err(err) => {
                log::warn!("⚠️ 第 {} 个图片引用处理失败：{}", idx + 1, err);
            }
        }
    }

    saved
}

fn save_inline_image(data_uri: &str, dest: &Path) -> Result<(), AppError> {
    let bytes = inline_data::decode_data_uri(data_uri)?;
    fs::write(dest, &bytes)?;
    Ok(())
}

/// 第 4 层：把原始位图编码为 PNG 落盘。
fn save_bitmap_png(bitmap: &BitmapData, target_dir: &Path, timestamp: &str) -> usize {
    let width = bitmap.width as u32;
    let height = bitmap.height as u32;
    let Some(image) = image::RgbaImage::from_raw(width, height, bitmap.rgba.clone()) else {
        log::warn!("⚠️ 位图尺寸与像素数据长度不一致，跳过保存");
        return 0;
    };

    let dest = naming::resolve_target(target_dir, &format!("Image_{}.png", timestamp), timestamp);
    match image.save_with_format(&dest, image::ImageFormat::Png) {
        Ok(()) => {
            log::info!("🖼️ 位图已保存为 {}", dest.display());
            1
        }
        Err(err) => {
            log::warn!("⚠️ 位图编码保存失败：{}", err);
            0
        }
    }
}

/// 对落盘图片做一次文件签名嗅探，仅用于诊断日志。
fn sniff_image_signature(path: &Path) {
    let mut head = Vec::with_capacity(SIGNATURE_PROBE_BYTES as usize);
    let Ok(file) = fs::File::open(path) else {
        return;
    };
    if file.take(SIGNATURE_PROBE_BYTES).read_to_end(&mut head).is_err() {
        return;
    }

    match infer::get(&head) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => {}
        Some(kind) => log::warn!(
            "⚠️ {} 的内容签名不是图片类型：{}",
            path.display(),
            kind.mime_type()
        ),
        None => log::warn!("⚠️ 无法识别 {} 的内容签名", path.display()),
    }
}
