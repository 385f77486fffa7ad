//! # 标记片段图片提取模块
//!
//! ## 设计思路
//!
//! 从 HTML / 富文本片段中找出内嵌图片引用。刻意不做完整的 HTML 解析，
//! 只对 `src="..."` 属性值做两轮正则扫描：内嵌 data URI 一轮、远程 URL
//! 一轮。畸形或嵌套引号的标记可能多匹配或漏匹配，属于已接受的启发式限制。
//!
//! ## 实现思路
//!
//! 1. 先解码 HTML 实体（`&quot;` 等出现在属性引号里会破坏匹配）。
//! 2. 内嵌匹配在前、远程匹配在后，合并为一个有序列表。调度器按这个
//!    顺序给输出文件编号，顺序是对外可见的行为。
//! 3. 远程 URL 在入列前先经过缩略图升级规则。
//! 4. 正则通过 `once_cell::sync::Lazy` 首次调用时编译，后续零成本复用。

use once_cell::sync::Lazy;
use regex::Regex;

use super::url_rules;

/// 标记片段中提取出的单个图片引用。
///
/// 生命周期只在一次分类流程内：提取后立即被调度器消费。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDescriptor {
    /// 内嵌编码数据，载荷为完整的 base64 data URI。
    InlineData(String),
    /// 远程引用，载荷为绝对 URL（已应用缩略图升级）。
    RemoteUrl(String),
}

/// 匹配 `src="data:image/...;base64,..."`（单双引号均可，不区分大小写）。
static INLINE_IMAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)src=["'](data:image/[^;"']+;base64,[^"']+)["']"#).unwrap()
});

/// 匹配 `src="http..."`（单双引号均可，不区分大小写）。
static REMOTE_IMAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)src=["'](http[^"']+)["']"#).unwrap());

/// 从标记片段中提取图片引用，按固定顺序返回：先内嵌、后远程。
pub fn extract_images(fragment: &str) -> Vec<ImageDescriptor> {
    if fragment.is_empty() {
        return Vec::new();
    }

    let decoded = decode_html_entities(fragment);
    let mut descriptors = Vec::new();

    for caps in INLINE_IMAGE_PATTERN.captures_iter(&decoded) {
        descriptors.push(ImageDescriptor::InlineData(caps[1].to_string()));
    }

    for caps in REMOTE_IMAGE_PATTERN.captures_iter(&decoded) {
        let url = url_rules::upgrade_to_full_resolution(&caps[1]);
        descriptors.push(ImageDescriptor::RemoteUrl(url));
    }

    log::debug!("🖼️ 标记片段提取到 {} 个图片引用", descriptors.len());
    descriptors
}

/// 解码常见 HTML 实体：命名子集 + 十进制/十六进制数字引用。
///
/// 单轮扫描，不做二次解码（`&amp;quot;` 解码为字面 `&quot;`）。
/// 未识别的实体原样保留。
fn decode_html_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // 实体名最长按 10 字符截断，找不到分号就按字面量处理
        let end = tail[1..].char_indices().take(10).find(|(_, c)| *c == ';');
        let Some((semi, _)) = end else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };

        let body = &tail[1..1 + semi];
        match decode_entity_body(body) {
            Some(ch) => {
                out.push(ch);
                rest = &tail[semi + 2..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity_body(body: &str) -> Option<char> {
    match body {
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
