//! 内嵌数据解码模块
//!
//! 把 `data:image/...;base64,<载荷>` 形式的 data URI 解码为原始字节。
//! 逗号分隔符缺失或载荷不是合法 base64 都视为畸形输入返回错误，
//! 由调用方决定跳过该图片（单图失败不影响同批其他图片）。

use base64::{Engine as _, engine::general_purpose};

use crate::error::AppError;

/// 解码 base64 data URI，返回载荷的原始字节。
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, AppError> {
    let comma = data_uri
        .find(',')
        .ok_or_else(|| AppError::Decode("data URI 缺少逗号分隔符".to_string()))?;

    general_purpose::STANDARD
        .decode(&data_uri[comma + 1..])
        .map_err(|e| AppError::Decode(format!("base64 解码失败：{}", e)))
}
