//! 拖放区配置。

use std::time::Duration;

use regex::Regex;

/// 默认的拒绝提示。
pub const DEFAULT_INVALID_FILE_MESSAGE: &str = "文件无效，请拖入单个文件";
/// 默认拖出去抖时长，用于吸收跨子元素时的进入/离开抖动。
pub const DEFAULT_LEAVE_DEBOUNCE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct DropTargetConfig {
    /// 禁用时忽略拖入与放下。
    pub disabled: bool,
    /// 放下的文件名必须匹配该正则。
    pub filename_pattern: Regex,
    /// 拒绝时交给 `on_reject` 的提示文案。
    pub invalid_file_message: String,
    pub leave_debounce: Duration,
}

impl DropTargetConfig {
    /// 匹配任意文件名的正则。
    pub fn match_all() -> Regex {
        Regex::new(".*").expect("通配正则编译失败")
    }

    /// 用字符串构建文件名正则。
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            filename_pattern: Regex::new(pattern)?,
            ..Self::default()
        })
    }
}

impl Default for DropTargetConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            filename_pattern: Self::match_all(),
            invalid_file_message: DEFAULT_INVALID_FILE_MESSAGE.to_string(),
            leave_debounce: DEFAULT_LEAVE_DEBOUNCE,
        }
    }
}
