//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 拖入的文件、选择器选中的文件、粘贴板里的文件数据来源不同，
//! 但摄取链路只需要四个能力：名称、体积、声明的 MIME、异步读取为 Data URL。
//! `FileSource` 把它们统一成一个 trait，具体实现见 `loader.rs`。
//!
//! - `IngestionRequest` 表示一次摄取的输入（文件或文本），只在单次操作内存在
//! - `EncodedOutput` 表示成功摄取的结果，不可变，由下一次成功摄取整体替换

use std::borrow::Cow;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use super::encoder::encode_data_url;
use super::IngestError;
use crate::drop_target::DroppedFile;

/// 输出内容类别，决定是否渲染图片预览。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Image,
    NonImage,
}

impl SourceKind {
    /// 按声明的 MIME 判定：包含 `image/` 即视为图片。
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.contains("image/") {
            Self::Image
        } else {
            Self::NonImage
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, Self::Image)
    }
}

/// 成功摄取的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedOutput {
    uri: String,
    source_kind: SourceKind,
    byte_length: u64,
}

impl EncodedOutput {
    pub fn new(uri: String, source_kind: SourceKind, byte_length: u64) -> Self {
        Self {
            uri,
            source_kind,
            byte_length,
        }
    }

    /// 完整 Data URL。
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// 原始内容字节数（编码前）。
    pub fn byte_length(&self) -> u64 {
        self.byte_length
    }

    /// Data URL 字符串长度，用于“可能过长”提示。
    pub fn encoded_len(&self) -> usize {
        self.uri.len()
    }

    /// 从 URI 中取出 MIME 部分。
    pub fn mime_type(&self) -> &str {
        self.uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(mime, _)| mime)
            .unwrap_or_default()
    }
}

/// 可被摄取的文件能力接口。
#[async_trait]
pub trait FileSource: Send + Sync {
    /// 文件名（不含目录），用于拖放区的文件名校验。
    fn name(&self) -> &str;

    /// 文件体积（字节）。读取前即可得知，用于体积校验。
    fn size(&self) -> u64;

    /// 声明的 MIME 类型；未知时为 `application/octet-stream`。
    fn mime_type(&self) -> &str;

    /// 读取完整内容。
    async fn read_bytes(&self) -> Result<Bytes, IngestError>;

    /// 读取完整内容并编码为 Data URL，MIME 取自 `mime_type()`。
    async fn read_as_data_url(&self) -> Result<String, IngestError> {
        let bytes = self.read_bytes().await?;
        Ok(encode_data_url(self.mime_type(), &bytes))
    }
}

impl DroppedFile for Box<dyn FileSource> {
    fn file_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name())
    }
}

/// 单次摄取的输入。
pub enum IngestionRequest {
    File(Box<dyn FileSource>),
    Text(String),
}

impl std::fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(file) => f
                .debug_struct("File")
                .field("name", &file.name())
                .field("size", &file.size())
                .field("mime_type", &file.mime_type())
                .finish(),
            Self::Text(text) => f.debug_struct("Text").field("len", &text.len()).finish(),
        }
    }
}

/// 已通过校验、正在读取中的文件凭据。
///
/// 由 `IngestPipeline::submit_file` 发放，读取完成后交回 `complete_read`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadTicket {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) mime_type: String,
    pub(crate) size: u64,
}

impl ReadTicket {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}
