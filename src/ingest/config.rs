//! # 配置模块
//!
//! ## 设计思路
//!
//! 摄取链路的阈值与时长集中在 `IngestConfig`，不在流程代码里写魔法数字。
//! `Default` 即参考行为：2 MiB 文件上限、500 KiB 输出警告阈值、1.5 秒复制确认。
//! 拖放区自己的去抖时长放在 `DropTargetConfig`。

use std::time::Duration;

use super::IngestError;

/// 默认最大文件体积（字节）。
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;
/// 默认输出长度警告阈值（字节）。
pub const DEFAULT_WARN_OUTPUT_LEN: u64 = 500 * 1024;
/// 默认复制确认展示时长。
pub const DEFAULT_COPY_CONFIRM_DURATION: Duration = Duration::from_millis(1_500);

/// 摄取链路配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// 允许读取的最大文件体积（字节），超出直接拒绝，不进入加载态。
    pub max_file_size: u64,
    /// Data URL 长度达到该值时提示“可能过长”，仅影响展示，不拒绝。
    pub warn_output_len: u64,
    /// 复制成功后确认态持续时长。
    pub copy_confirm_duration: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            warn_output_len: DEFAULT_WARN_OUTPUT_LEN,
            copy_confirm_duration: DEFAULT_COPY_CONFIRM_DURATION,
        }
    }
}

impl IngestConfig {
    /// 校验配置是否可用。
    ///
    /// 0 字节上限会拒绝一切非空文件，0 时长的确认态则永远不可见，两者都视为配置错误。
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_size == 0 {
            return Err("max_file_size 必须大于 0".to_string());
        }
        if self.warn_output_len == 0 {
            return Err("warn_output_len 必须大于 0".to_string());
        }
        if self.copy_confirm_duration.is_zero() {
            return Err("copy_confirm_duration 必须大于 0".to_string());
        }
        Ok(())
    }

    /// 校验文件体积。
    pub(crate) fn check_file_size(&self, size: u64) -> Result<(), IngestError> {
        if size > self.max_file_size {
            return Err(super::ValidationError::FileTooLarge {
                size,
                limit: self.max_file_size,
            }
            .into());
        }
        Ok(())
    }

    /// 输出长度是否达到警告阈值。
    pub fn is_output_large(&self, encoded_len: usize) -> bool {
        encoded_len as u64 >= self.warn_output_len
    }
}
