//! # 加载模块
//!
//! ## 设计思路
//!
//! 提供 `FileSource` 的两种实现：
//! - `LocalFile`：磁盘上的文件（拖入的路径或文件选择器结果）
//! - `MemoryFile`：内存中的数据（粘贴板里的文件数据、测试）
//!
//! ## 实现思路
//!
//! - `LocalFile::open` 只读取 metadata，不读内容，保证体积校验在读取之前完成。
//! - 声明的 MIME 先按扩展名查表，查不到再用 `infer` 嗅探文件头，
//!   仍无结果时回退 `application/octet-stream`。
//! - 内容读取走 `tokio::fs`，不阻塞调度任务。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use super::encoder::MIME_OCTET_STREAM;
use super::source::FileSource;
use super::IngestError;

/// 按扩展名给出的声明类型。
fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "xml" => "text/xml",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}

/// 解析文件的声明 MIME。
pub fn resolve_mime_type(path: &Path) -> String {
    if let Some(mime) = mime_from_extension(path) {
        return mime.to_string();
    }

    match infer::get_from_path(path) {
        Ok(Some(kind)) => {
            log::debug!("🔎 扩展名未知，按文件头识别为 {} - {}", kind.mime_type(), path.display());
            kind.mime_type().to_string()
        }
        Ok(None) => MIME_OCTET_STREAM.to_string(),
        Err(err) => {
            log::debug!("文件头识别失败，回退 {}：{}", MIME_OCTET_STREAM, err);
            MIME_OCTET_STREAM.to_string()
        }
    }
}

/// 磁盘文件。
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    size: u64,
    mime_type: String,
}

impl LocalFile {
    /// 读取 metadata 构建文件句柄，不读取内容。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .map_err(|e| IngestError::Read(format!("{}（{}）", e, path.display())))?;

        if !metadata.is_file() {
            return Err(IngestError::Read(format!("不是普通文件：{}", path.display())));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            mime_type: resolve_mime_type(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_bytes(&self) -> Result<Bytes, IngestError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| IngestError::Read(e.to_string()))?;
        Ok(Bytes::from(bytes))
    }
}

/// 内存文件。
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    data: Bytes,
}

impl MemoryFile {
    /// `mime_type` 为空时按 `application/octet-stream` 处理。
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            MIME_OCTET_STREAM.to_string()
        } else {
            mime_type
        };

        Self {
            name: name.into(),
            mime_type,
            data: data.into(),
        }
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_bytes(&self) -> Result<Bytes, IngestError> {
        Ok(self.data.clone())
    }
}
