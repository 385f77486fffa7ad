//! # 文件命名策略模块
//!
//! ## 设计思路
//!
//! 所有落盘文件名都经过这里统一裁决，保证两条不变量：
//! 1. 绝不覆盖目标目录中已存在的文件，命中时在主名与扩展名之间插入时间戳后缀。
//! 2. 同一次粘贴事件产生的多个文件共享同一个时间戳，便于用户按事件归档。
//!
//! ## 实现思路
//!
//! - 时间戳格式固定为 `yyyy-MM-dd_HH-mm-ss`，由调度器在入口处计算一次。
//! - 派生名（`{主名}_{时间戳}{扩展名}`）不做二次查重：同一秒内对同名文件
//!   重复粘贴仍可能撞名，属于已接受的限制。

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// 生成本次粘贴事件的共享时间戳。
pub fn paste_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// 在目标目录内解析一个不会覆盖现有文件的落盘路径。
///
/// # 参数
/// * `dir` - 目标目录（调用方保证已存在）
/// * `desired_name` - 期望的文件名
/// * `timestamp` - 本次事件的共享时间戳
pub fn resolve_target(dir: &Path, desired_name: &str, timestamp: &str) -> PathBuf {
    let candidate = dir.join(desired_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(desired_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| desired_name.to_string());

    match name.extension() {
        Some(ext) => dir.join(format!("{}_{}.{}", stem, timestamp, ext.to_string_lossy())),
        None => dir.join(format!("{}_{}", stem, timestamp)),
    }
}
