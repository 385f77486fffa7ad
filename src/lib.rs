//! # paste-here — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              调用方 (CLI / 外壳集成工具)                  │
//! │                  传入：目标目录路径                       │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓              核心 (Rust)                          │
//! │                                                          │
//! │  ┌─ clipboard ── 系统剪贴板 → ClipboardBundle 快照        │
//! │  │                                                       │
//! │  ├─ paste ────── 分类调度 · 命名策略 · URL 规则           │
//! │  │   │           · 标记提取 · 内嵌解码                    │
//! │  │   └─ PasteOutcome (Saved(n) / NothingApplicable)      │
//! │  │                                                       │
//! │  ├─ fetch ────── Fetcher 契约 + reqwest 流式下载          │
//! │  ├─ bundle ───── 快照数据模型（显式传参，可构造测试）      │
//! │  └─ error ────── AppError (统一错误类型)                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，只有目标目录前置校验是致命错误 |
//! | [`bundle`] | 剪贴板快照数据模型，核心入口的显式输入 |
//! | [`clipboard`] | 系统剪贴板采集（arboard + Windows 专属槽位） |
//! | [`paste`] | 分类调度、文件命名、URL 规则、标记提取、内嵌解码 |
//! | [`fetch`] | 下载协作方契约与 reqwest 生产实现 |

pub mod bundle;
pub mod clipboard;
pub mod error;
pub mod fetch;
pub mod paste;
