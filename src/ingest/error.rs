//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 摄取链路中的所有失败都归入 `IngestError`，调用侧可按分支区分：
//! - `Validation`：读取前就能判定的输入问题（体积、文件名、数量）
//! - `Read`：异步读取阶段的 I/O 失败
//! - `Encoding`：文本无法按 Latin-1 编码为 Base64
//! - `Clipboard`：写入系统剪贴板失败
//! - `Busy`：已有读取在进行中，新提交被忽略
//! - `StaleRead`：过期的读取结果，只记日志
//!
//! 所有分支都不会修改已有输出，失败后需要用户重新操作。

use crate::format::format_size;

/// 摄取链路统一错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("无法读取文件，系统返回：\"{0}\"")]
    Read(String),

    #[error("{0}")]
    Encoding(#[from] EncodingError),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("正在读取上一个文件，请稍候")]
    Busy,

    /// 读取结果与当前进行中的读取不对应，直接丢弃。
    #[error("读取结果已失效（#{0}）")]
    StaleRead(u64),
}

/// 读取前校验失败。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", too_large_message(.size, .limit))]
    FileTooLarge { size: u64, limit: u64 },

    /// 文件名不匹配、拖入多个文件或没有文件。消息由拖放区配置决定。
    #[error("{0}")]
    InvalidFile(String),
}

/// 文本编码失败。
///
/// 文本按 Latin-1 逐字节编码，超出 U+00FF 的字符无法表示。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("文本包含无法编码的字符 {ch:?}（位置 {index}），仅支持 Latin-1 字符")]
    NonLatin1 { ch: char, index: usize },
}

fn too_large_message(size: &u64, limit: &u64) -> String {
    format!(
        "所选文件过大（{}），请将文件控制在 {} 以内后重试",
        format_size(*size),
        format_size(*limit)
    )
}

impl IngestError {
    /// 稳定错误码，供前端区分提示样式。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::FileTooLarge { .. }) => "E_FILE_TOO_LARGE",
            Self::Validation(ValidationError::InvalidFile(_)) => "E_INVALID_FILE",
            Self::Read(_) => "E_READ",
            Self::Encoding(_) => "E_ENCODING",
            Self::Clipboard(_) => "E_CLIPBOARD",
            Self::Busy => "E_BUSY",
            Self::StaleRead(_) => "E_STALE_READ",
        }
    }
}

impl From<IngestError> for String {
    fn from(error: IngestError) -> Self {
        error.to_string()
    }
}
