//! # 粘贴核心模块（paste）
//!
//! ## 设计思路
//!
//! 该模块把"剪贴板内容 → 落盘文件"的决策链按职责拆分为多个子模块，
//! 避免单文件膨胀与耦合：
//!
//! - `dispatcher`：编排固定优先级的分类流程
//! - `naming`：文件命名与防覆盖策略
//! - `url_rules`：可下载 URL 启发式与缩略图升级规则表
//! - `markup`：标记片段中的图片引用提取
//! - `inline_data`：base64 data URI 解码
//!
//! ## 调用链
//!
//! ```text
//! main（或任意调用方）
//!    ↓
//! dispatcher::save_clipboard_content（快照 + 目录 + 下载器）
//!    ├─ naming（每个输出路径都经过这里）
//!    ├─ url_rules（文本层：是否当下载指令处理）
//!    ├─ markup（标记层：提取图片引用）
//!    │    └─ url_rules（远程引用的缩略图升级）
//!    └─ inline_data（内嵌引用的解码）
//!    ↓
//! PasteOutcome（Saved(n) / NothingApplicable）
//! ```

mod dispatcher;
mod inline_data;
mod markup;
mod naming;
mod url_rules;

pub use dispatcher::{PasteOutcome, save_clipboard_content};
pub use inline_data::decode_data_uri;
pub use markup::{ImageDescriptor, extract_images};
pub use naming::{paste_timestamp, resolve_target};
pub use url_rules::{filename_from_url, looks_like_file_url, upgrade_to_full_resolution};
