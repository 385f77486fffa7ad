//! # URL 分类与重写模块
//!
//! ## 设计思路
//!
//! 两件事：判断一段文本"看起来像一个指向可下载文件的 URL"，以及把已知的
//! 缩略图 URL 升级为原图 URL。
//!
//! 分类是刻意宽松的启发式：只要以 `http` 开头且任意位置出现已知扩展名子串
//! 就算命中（查询串里带 `.zip` 也算）。它的职责是决定"要不要尝试下载"，
//! 下载失败时调度器会降级为保存纯文本，所以误判的代价很低。
//!
//! ## 实现思路
//!
//! - 重写规则放在一张开放的规则表里，新增站点规则不影响调用方。
//! - 目前唯一的规则是 media-wiki 缩略图约定：路径中 `/thumb/` 段加末尾
//!   派生文件名被移除，还原原图路径。按路径形状匹配，不限定主机。

use once_cell::sync::Lazy;
use regex::Regex;

/// 触发下载尝试的已知文件扩展名（小写，子串匹配）。
const KNOWN_EXTENSIONS: &[&str] = &[
    ".zip", ".exe", ".pdf", ".jpg", ".png", ".mp4", ".mp3", ".docx",
];

/// 判断文本是否像一个指向可下载文件的 URL。
///
/// 必须以 `http` 开头（不区分大小写），且在首字符之后出现任一已知扩展名。
/// 这是启发式而非保证：`http://x.com/a?name=.zip` 同样会命中。
pub fn looks_like_file_url(text: &str) -> bool {
    let lower = text.to_lowercase();
    if !lower.starts_with("http") {
        return false;
    }

    KNOWN_EXTENSIONS
        .iter()
        .any(|ext| matches!(lower.find(ext), Some(pos) if pos > 0))
}

/// 从 URL 推导下载文件名。
///
/// 取最后一个路径段，截断首个 `?` 之后的查询串；若剩余部分没有扩展名，
/// 退化为 `Download_{时间戳}.file`。
pub fn filename_from_url(url: &str, timestamp: &str) -> String {
    let last_segment = url.rsplit(['/', '\\']).next().unwrap_or(url);
    let name = match last_segment.find('?') {
        Some(pos) => &last_segment[..pos],
        None => last_segment,
    };

    let has_extension = std::path::Path::new(name).extension().is_some();
    if name.is_empty() || !has_extension {
        return format!("Download_{}.file", timestamp);
    }

    name.to_string()
}

/// 单条重写规则：匹配则返回改写后的 URL，不匹配返回 `None`。
type RewriteRule = fn(&str) -> Option<String>;

/// 缩略图升级规则表。新增站点规则时在这里追加即可。
static REWRITE_RULES: &[RewriteRule] = &[rewrite_mediawiki_thumb];

/// 把已知模式的缩略图 URL 升级为原图 URL。
///
/// 依次尝试规则表中的每条规则，首个命中者生效；全部不命中则原样返回。
pub fn upgrade_to_full_resolution(url: &str) -> String {
    for rule in REWRITE_RULES {
        if let Some(rewritten) = rule(url) {
            log::debug!("🔍 缩略图升级：{} -> {}", url, rewritten);
            return rewritten;
        }
    }
    url.to_string()
}

/// media-wiki 缩略图约定：`{前缀}/thumb/{原图路径}/{派生文件名}`。
///
/// 移除 `/thumb/` 段与末尾派生文件名，拼回 `{前缀}/{原图路径}`。
fn rewrite_mediawiki_thumb(url: &str) -> Option<String> {
    static THUMB_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(.+)/thumb/(.+)/[^/]+$").unwrap());

    if !url.contains("/thumb/") {
        return None;
    }

    let caps = THUMB_PATTERN.captures(url)?;
    Some(format!("{}/{}", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_with_known_extension_is_detected() {
        assert!(looks_like_file_url("https://example.com/files/setup.zip"));
    }

    #[test]
    fn extension_match_is_case_insensitive_and_anywhere() {
        assert!(looks_like_file_url("http://x.com/a.PDF?x=1"));
        assert!(looks_like_file_url("http://x.com/get?file=movie.MP4"));
    }

    #[test]
    fn plain_text_is_rejected() {
        assert!(!looks_like_file_url("just some text"));
    }

    #[test]
    fn url_without_known_extension_is_rejected() {
        assert!(!looks_like_file_url("http://x.com/page"));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(!looks_like_file_url("ftp://example.com/a.zip"));
    }

    #[test]
    fn filename_is_last_path_segment() {
        assert_eq!(filename_from_url("https://example.com/cat.jpg", "TS"), "cat.jpg");
    }

    #[test]
    fn filename_truncates_query_string() {
        assert_eq!(
            filename_from_url("https://example.com/report.pdf?token=abc", "TS"),
            "report.pdf"
        );
    }

    #[test]
    fn filename_without_extension_falls_back_to_download_name() {
        assert_eq!(
            filename_from_url("https://example.com/files?type=.zip", "TS"),
            "Download_TS.file"
        );
    }

    #[test]
    fn filename_for_trailing_slash_falls_back_to_download_name() {
        assert_eq!(
            filename_from_url("https://example.com/download/", "TS"),
            "Download_TS.file"
        );
    }

    #[test]
    fn mediawiki_thumb_url_is_upgraded() {
        assert_eq!(
            upgrade_to_full_resolution("https://a/thumb/commons/x/y/File.jpg"),
            "https://a/commons/x/y"
        );
    }

    #[test]
    fn wikipedia_thumb_url_is_upgraded() {
        let url = "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3a/Cat.jpg/220px-Cat.jpg";
        assert_eq!(
            upgrade_to_full_resolution(url),
            "https://upload.wikimedia.org/wikipedia/commons/3/3a/Cat.jpg"
        );
    }

    #[test]
    fn non_thumb_url_passes_through_unchanged() {
        let url = "https://example.com/images/photo.jpg";
        assert_eq!(upgrade_to_full_resolution(url), url);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// 不以 http 开头的输入永远不会被判定为可下载 URL。
            #[test]
            fn non_http_prefix_never_matches(text in "[a-gi-z][a-z0-9./?=_-]{0,40}") {
                prop_assert!(!looks_like_file_url(&text));
            }
        }
    }
}
