//! # 编码模块
//!
//! ## 设计思路
//!
//! 负责“字节/文本 → Data URL”的纯函数部分，不涉及状态与 I/O：
//! - `encode_data_url`：`data:<mime>;base64,<payload>`
//! - `decode_data_url`：反向解析，校验与往返测试使用
//! - `classify_text`：粘贴文本的 MIME 判定（`<html` / `<svg` 子串匹配）
//! - `encode_text`：按 Latin-1 逐字节编码文本
//!
//! ## 实现思路
//!
//! 文本分类只做子串匹配，不做任何结构校验，误判是可接受行为。
//! 文本编码与浏览器 `btoa` 保持一致：每个字符必须落在 U+0000..=U+00FF，
//! 超出范围时返回 `EncodingError::NonLatin1`，由上层决定如何提示。

use base64::{Engine as _, engine::general_purpose};
use once_cell::sync::Lazy;
use regex::Regex;

use super::source::SourceKind;
use super::{EncodingError, IngestError};

pub const MIME_TEXT_PLAIN: &str = "text/plain";
pub const MIME_TEXT_HTML: &str = "text/html";
pub const MIME_SVG: &str = "image/svg+xml";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

const HTML_MARKER: &str = "<html";
const SVG_MARKER: &str = "<svg";

static DATA_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:([^;,]*);base64,(.*)$").expect("Data URL 正则编译失败")
});

/// 将字节编码为 Base64 Data URL。
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let payload = general_purpose::STANDARD.encode(bytes);
    let mut uri = String::with_capacity(5 + mime_type.len() + 8 + payload.len());
    uri.push_str("data:");
    uri.push_str(mime_type);
    uri.push_str(";base64,");
    uri.push_str(&payload);
    uri
}

/// 解析 Base64 Data URL，返回 `(mime, bytes)`。
///
/// 仅接受 `;base64,` 形式；MIME 为空时按 `text/plain` 处理。
pub fn decode_data_url(uri: &str) -> Result<(String, Vec<u8>), IngestError> {
    let captures = DATA_URL_PATTERN
        .captures(uri)
        .ok_or_else(|| IngestError::Read("不是 Base64 形式的 Data URL".to_string()))?;

    let mime = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let payload = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| IngestError::Read(format!("Base64 解码失败：{}", e)))?;

    let mime = if mime.is_empty() { MIME_TEXT_PLAIN } else { mime };
    Ok((mime.to_string(), bytes))
}

/// 判定粘贴文本的 MIME 与来源类别。
///
/// `<html` 优先于 `<svg`，两者都不命中时视为纯文本。
pub fn classify_text(text: &str) -> (&'static str, SourceKind) {
    if text.contains(HTML_MARKER) {
        (MIME_TEXT_HTML, SourceKind::NonImage)
    } else if text.contains(SVG_MARKER) {
        (MIME_SVG, SourceKind::Image)
    } else {
        (MIME_TEXT_PLAIN, SourceKind::NonImage)
    }
}

/// 将文本按 Latin-1 转为字节。
pub fn latin1_bytes(text: &str) -> Result<Vec<u8>, EncodingError> {
    let mut bytes = Vec::with_capacity(text.len());
    for (index, ch) in text.chars().enumerate() {
        let code = ch as u32;
        if code > 0xFF {
            return Err(EncodingError::NonLatin1 { ch, index });
        }
        bytes.push(code as u8);
    }
    Ok(bytes)
}

/// 编码粘贴文本，返回 `(uri, kind, 原始字节数)`。
pub fn encode_text(text: &str) -> Result<(String, SourceKind, u64), EncodingError> {
    let (mime, kind) = classify_text(text);
    let bytes = latin1_bytes(text)?;
    Ok((encode_data_url(mime, &bytes), kind, bytes.len() as u64))
}
