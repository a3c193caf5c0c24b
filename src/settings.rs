//! 应用设置
//!
//! # 设计思路
//!
//! 设置以 JSON 文件保存（`settings.json`），所有字段可选，缺省时取参考值。
//! 读取后先校验再转换为 `IngestConfig` 与 `DropTargetConfig`，
//! 非法值（0 字节上限、无法编译的正则）直接返回错误，不做静默修正。
//!
//! 设置文件所在目录由外层决定（桌面端为应用数据目录）。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::drop_target::{DEFAULT_INVALID_FILE_MESSAGE, DEFAULT_LEAVE_DEBOUNCE, DropTargetConfig};
use crate::error::AppError;
use crate::ingest::{
    DEFAULT_COPY_CONFIRM_DURATION, DEFAULT_MAX_FILE_SIZE, DEFAULT_WARN_OUTPUT_LEN, IngestConfig,
};

pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub max_file_size: u64,
    pub warn_output_len: u64,
    pub copy_confirm_ms: u64,
    pub drag_leave_debounce_ms: u64,
    pub filename_pattern: String,
    pub invalid_file_message: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            warn_output_len: DEFAULT_WARN_OUTPUT_LEN,
            copy_confirm_ms: DEFAULT_COPY_CONFIRM_DURATION.as_millis() as u64,
            drag_leave_debounce_ms: DEFAULT_LEAVE_DEBOUNCE.as_millis() as u64,
            filename_pattern: ".*".to_string(),
            invalid_file_message: DEFAULT_INVALID_FILE_MESSAGE.to_string(),
        }
    }
}

impl AppSettings {
    /// 设置文件路径。
    pub fn file_path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE_NAME)
    }

    /// 从目录读取设置；文件不存在时返回默认值。
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let path = Self::file_path(dir);
        if !path.exists() {
            log::debug!("设置文件不存在，使用默认设置：{}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验后写入目录，目录不存在时自动创建。
    pub fn save(&self, dir: &Path) -> Result<(), AppError> {
        self.validate()?;

        fs::create_dir_all(dir)
            .map_err(|e| AppError::Settings(format!("创建设置目录失败: {}", e)))?;

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;
        fs::write(Self::file_path(dir), content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.ingest_config()?;
        self.drop_target_config()?;
        Ok(())
    }

    pub fn ingest_config(&self) -> Result<IngestConfig, AppError> {
        let config = IngestConfig {
            max_file_size: self.max_file_size,
            warn_output_len: self.warn_output_len,
            copy_confirm_duration: Duration::from_millis(self.copy_confirm_ms),
        };
        config.validate().map_err(AppError::Settings)?;
        Ok(config)
    }

    pub fn drop_target_config(&self) -> Result<DropTargetConfig, AppError> {
        if self.drag_leave_debounce_ms > 1_000 {
            return Err(AppError::Settings(
                "dragLeaveDebounceMs 不能超过 1000 毫秒".to_string(),
            ));
        }

        let filename_pattern = Regex::new(&self.filename_pattern)
            .map_err(|e| AppError::Settings(format!("文件名正则无效: {}", e)))?;

        Ok(DropTargetConfig {
            disabled: false,
            filename_pattern,
            invalid_file_message: self.invalid_file_message.clone(),
            leave_debounce: Duration::from_millis(self.drag_leave_debounce_ms),
        })
    }
}
