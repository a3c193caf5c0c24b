//! 用户提示
//!
//! 体积超限、文件无效、读取失败等情况需要打断式提示。
//! 核心只依赖 `Notifier`，具体是弹窗、Toast 还是日志由外层决定。

use serde::Serialize;

use crate::ingest::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// 一条面向用户的提示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: &'static str,
    pub message: String,
}

impl Notice {
    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            code,
            message: message.into(),
        }
    }
}

impl From<&IngestError> for Notice {
    fn from(error: &IngestError) -> Self {
        match error {
            IngestError::Validation(_)
            | IngestError::Encoding(_)
            | IngestError::Busy
            | IngestError::StaleRead(_) => {
                Self::warning(error.code(), error.to_string())
            }
            IngestError::Read(_) | IngestError::Clipboard(_) => Self::error(error.code(), error.to_string()),
        }
    }
}

/// 提示出口。
pub trait Notifier: Send {
    fn notify(&self, notice: Notice);
}

/// 只写日志的提示出口，无界面时使用。
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Warning => log::warn!("[{}] {}", notice.code, notice.message),
            NoticeLevel::Error => log::error!("[{}] {}", notice.code, notice.message),
        }
    }
}
