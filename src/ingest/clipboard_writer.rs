//! # 剪贴板写入模块
//!
//! ## 设计思路
//!
//! 系统剪贴板是外部依赖，写入可能需要权限协商或被其他进程占用。
//! 这里用 `ClipboardSink` 隔离它：生产环境走 `arboard`，测试注入内存实现。
//!
//! ## 实现思路
//!
//! `arboard::Clipboard` 的调用是阻塞的，放进 `spawn_blocking` 执行，避免卡住调度任务。
//! 写入只尝试一次，失败直接返回 `IngestError::Clipboard`，由用户再次点击重试。

use async_trait::async_trait;

use super::IngestError;

/// 文本剪贴板写入接口。
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    async fn write_text(&self, text: String) -> Result<(), IngestError>;
}

/// 基于 `arboard` 的系统剪贴板。
#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardClipboard;

impl ArboardClipboard {
    fn write_blocking(text: String) -> Result<(), IngestError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| IngestError::Clipboard(format!("无法访问剪贴板：{}", e)))?;
        clipboard
            .set_text(text)
            .map_err(|e| IngestError::Clipboard(format!("写入剪贴板失败：{}", e)))
    }
}

#[async_trait]
impl ClipboardSink for ArboardClipboard {
    async fn write_text(&self, text: String) -> Result<(), IngestError> {
        let len = text.len();
        log::debug!("📋 准备写入剪贴板 - {} 字符", len);

        tokio::task::spawn_blocking(move || Self::write_blocking(text))
            .await
            .map_err(|e| IngestError::Clipboard(format!("线程执行失败：{}", e)))??;

        log::info!("✅ 已复制 Data URL 到剪贴板（{} 字符）", len);
        Ok(())
    }
}
