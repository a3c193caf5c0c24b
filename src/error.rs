//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError`，摄取链路的 `IngestError` 通过 `From` 上转，
//! 设置读写、文件系统、桌面端窗口操作的错误也收敛到这里。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

use crate::ingest::IngestError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 摄取链路错误（校验 / 读取 / 编码 / 剪贴板）
    #[error("{0}")]
    Ingest(#[from] IngestError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置无效或读写失败
    #[error("设置错误: {0}")]
    Settings(String),

    /// 调度器已卸载，事件无法投递
    #[error("应用尚未就绪")]
    NotMounted,

    /// 窗口操作失败
    #[error("窗口操作失败: {0}")]
    Window(String),
}

/// Tauri IPC 要求返回值实现 `Serialize`。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let err = AppError::Settings("bad".to_string());
        let json = serde_json::to_string(&err).expect("serialize");
        assert_eq!(json, "\"设置错误: bad\"");
    }

    #[test]
    fn ingest_errors_keep_their_message() {
        let err = AppError::from(IngestError::Read("denied".to_string()));
        assert!(err.to_string().contains("denied"));
    }
}
