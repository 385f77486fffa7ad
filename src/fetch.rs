//! # 网络获取模块
//!
//! ## 设计思路
//!
//! 调度器眼中的下载是一个阻塞的请求/响应调用：给定 URL 与目标路径，
//! 返回成功或失败，中途可选地向进度回调汇报若干次。进度纯属调用方的
//! UI 关注点，核心流程不依赖它。
//!
//! 失败或中断绝不能在目标路径留下半截文件，实现上先把响应体完整缓冲
//! 到内存，校验通过后才一次性写盘。
//!
//! ## 实现思路
//!
//! - `Fetcher` trait 是对外契约，测试用 mock 替身，生产用 `HttpFetcher`。
//! - `HttpFetcher` 内部持有独立的 tokio 运行时，用 `block_on` 驱动
//!   reqwest 的流式下载：首包与分块分别设超时，边收边累计体积上限，
//!   可重试的 HTTP 状态（408/429/5xx）按指数退避重试。
//! - 网络错误统一映射到 `FetchError`，便于上层按分支处理。

use std::path::Path;
use std::time::Duration;

const RETRY_MAX_ATTEMPTS: u8 = 3;
const RETRY_BASE_DELAY_MS: u64 = 180;
const BUFFER_INITIAL_CAPACITY: usize = 16 * 1024;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// 下载链路统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("URL 格式错误：{0}")]
    InvalidUrl(String),

    #[error("网络错误：{0}")]
    Network(String),

    #[error("超时错误：{0}")]
    Timeout(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("文件错误：{0}")]
    FileSystem(String),
}

/// 下载行为配置。
///
/// `Default` 提供生产可用的参数组合。
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// 允许下载的最大文件体积（字节）。响应体完整缓冲在内存中，
    /// 该上限同时约束内存峰值。
    pub max_file_size: u64,
    /// 整个请求（含响应体读取）的总超时时间（秒）。
    pub download_timeout: u64,
    /// 建立连接（TCP/TLS）超时时间（秒）。
    pub connect_timeout: u64,
    /// 下载首包超时时间（毫秒）。
    pub stream_first_byte_timeout_ms: u64,
    /// 下载分块读取超时时间（毫秒）。
    pub stream_chunk_timeout_ms: u64,
    /// 最大重定向次数。
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_file_size: 512 * 1024 * 1024,
            download_timeout: 300,
            connect_timeout: 8,
            stream_first_byte_timeout_ms: 10_000,
            stream_chunk_timeout_ms: 15_000,
            max_redirects: 5,
        }
    }
}

/// 下载协作方契约。
///
/// 调度器对下载的全部假设都在这里：阻塞调用、结果二值、进度可选。
pub trait Fetcher {
    /// 把 `url` 的内容取回到 `dest`。
    ///
    /// `on_progress(已接收字节, 总字节)` 在结果落定前被调用零次或多次；
    /// 总字节在服务端未声明 Content-Length 时为 `None`。
    /// 失败时 `dest` 必须保持不存在。
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<(), FetchError>;

    /// 不关心进度的便捷入口。
    fn fetch_quiet(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.fetch(url, dest, &mut |_, _| {})
    }
}

/// 基于 reqwest 的生产实现。
pub struct HttpFetcher {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// 根据配置创建下载器。
    ///
    /// HTTP 客户端在此一次性构建复用，减少每次请求的初始化开销。
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FetchError::Network(format!("无法创建异步运行时：{}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self {
            runtime,
            client,
            config,
        })
    }

    /// 执行带校验的流式下载，返回完整响应体。
    async fn download(
        &self,
        url: &str,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<Vec<u8>, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}：{}", redact_url_for_log(url), e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::InvalidUrl(format!(
                "仅支持 HTTP/HTTPS：{}",
                parsed.scheme()
            )));
        }

        let response = {
            let mut attempt: u8 = 1;
            loop {
                let send_result = self
                    .client
                    .get(parsed.clone())
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .send()
                    .await;

                match send_result {
                    Ok(resp) => {
                        if attempt < RETRY_MAX_ATTEMPTS && is_retryable_http_status(resp.status()) {
                            let delay_ms = retry_delay_ms(attempt);
                            log::warn!(
                                "⚠️ HTTP {}（第 {}/{} 次，可重试）；{}ms 后重试",
                                resp.status().as_u16(),
                                attempt,
                                RETRY_MAX_ATTEMPTS,
                                delay_ms
                            );
                            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                            attempt = attempt.saturating_add(1);
                            continue;
                        }
                        break resp;
                    }
                    Err(err) => {
                        if attempt >= RETRY_MAX_ATTEMPTS || !is_retryable_network_error(&err) {
                            return Err(self.map_reqwest_error(err, url));
                        }
                        let delay_ms = retry_delay_ms(attempt);
                        log::warn!(
                            "⚠️ 网络请求失败（第 {}/{} 次，可重试）；{}ms 后重试",
                            attempt,
                            RETRY_MAX_ATTEMPTS,
                            delay_ms
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        attempt = attempt.saturating_add(1);
                    }
                }
            }
        };

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "HTTP {}: {}",
                response.status().as_u16(),
                status_message(response.status().as_u16())
            )));
        }

        let total_len = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|cl| cl.to_str().ok())
            .and_then(|cl| cl.parse::<u64>().ok());

        if let Some(size) = total_len {
            if size > self.config.max_file_size {
                return Err(FetchError::ResourceLimit(format!(
                    "文件过大：{:.2} MB（限制：{:.2} MB）",
                    size as f64 / 1024.0 / 1024.0,
                    self.config.max_file_size as f64 / 1024.0 / 1024.0
                )));
            }
        }

        on_progress(0, total_len);

        let initial_capacity = total_len
            .map(|len| len.min(self.config.max_file_size).min(usize::MAX as u64) as usize)
            .filter(|len| *len > 0)
            .unwrap_or(BUFFER_INITIAL_CAPACITY);
        let mut buffer = Vec::with_capacity(initial_capacity);
        let mut total: u64 = 0;
        let mut received_first_chunk = false;
        let mut response = response;

        loop {
            let read_timeout = if received_first_chunk {
                Duration::from_millis(self.config.stream_chunk_timeout_ms)
            } else {
                Duration::from_millis(self.config.stream_first_byte_timeout_ms)
            };

            let next_chunk = tokio::time::timeout(read_timeout, response.chunk())
                .await
                .map_err(|_| {
                    if received_first_chunk {
                        FetchError::Timeout("下载数据流读取超时".to_string())
                    } else {
                        FetchError::Timeout("下载首包超时".to_string())
                    }
                })?;

            let Some(chunk) = next_chunk
                .map_err(|e| FetchError::Network(format!("下载失败：{}", e)))?
            else {
                break;
            };

            received_first_chunk = true;
            total = total.saturating_add(chunk.len() as u64);
            if total > self.config.max_file_size {
                return Err(FetchError::ResourceLimit(
                    "下载内容超过体积限制".to_string(),
                ));
            }

            buffer.extend_from_slice(&chunk);
            on_progress(total, total_len);
        }

        on_progress(total, total_len.or(Some(total)));
        log::debug!("✅ 下载完成 - {} bytes", total);

        Ok(buffer)
    }

    /// 统一映射 reqwest 错误到业务错误。
    fn map_reqwest_error(&self, e: reqwest::Error, url: &str) -> FetchError {
        let redacted = redact_url_for_log(url);
        if e.is_timeout() {
            FetchError::Timeout(format!("下载超时（{}秒）", self.config.download_timeout))
        } else if e.is_connect() {
            FetchError::Network(format!("无法连接：{}", redacted))
        } else {
            FetchError::Network(format!("请求失败：{}", e.to_string().replace(url, &redacted)))
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<(), FetchError> {
        log::info!("🌐 开始下载 - URL: {}", redact_url_for_log(url));

        let bytes = self.runtime.block_on(self.download(url, on_progress))?;

        std::fs::write(dest, &bytes).map_err(|e| {
            FetchError::FileSystem(format!("写入 {} 失败：{}", dest.display(), e))
        })?;

        log::info!("✅ 已保存 {} 字节 -> {}", bytes.len(), dest.display());
        Ok(())
    }
}

fn is_retryable_http_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn is_retryable_network_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }

    let msg = error.to_string().to_lowercase();
    msg.contains("connection reset")
        || msg.contains("connection closed before message completed")
        || msg.contains("peer closed connection")
}

fn retry_delay_ms(attempt: u8) -> u64 {
    RETRY_BASE_DELAY_MS.saturating_mul(1_u64 << (attempt.saturating_sub(1) as u32))
}

/// 常见 HTTP 状态码本地化文案。
fn status_message(code: u16) -> &'static str {
    match code {
        404 => "未找到",
        403 => "访问被拒绝",
        500..=599 => "服务器错误",
        _ => "请求失败",
    }
}

/// 日志用 URL 脱敏：去掉查询串与片段，避免泄漏 token。
fn redact_url_for_log(url: &str) -> String {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return "<invalid-url>".to_string();
    };

    let host = parsed.host_str().unwrap_or("<unknown-host>");
    let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();
    format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
}
