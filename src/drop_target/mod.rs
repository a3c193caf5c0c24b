//! # 拖放区模块（drop_target）
//!
//! ## 设计思路
//!
//! 可复用的拖放区域：跟踪拖入/离开/悬停/放下，校验放下的文件，
//! 再把结果交给调用方。与编码链路没有任何依赖。
//!
//! 状态只有两个：`Inactive`（初始）与 `Active`，没有终止态。
//!
//! ```text
//!            drag_enter（有文件且未禁用）
//! Inactive ───────────────────────────────▶ Active
//!    ▲                                        │
//!    └──── drop / drag_leave 去抖到期 ─────────┘
//! ```
//!
//! ## 实现思路
//!
//! - 平台在跨越子元素时会连续触发 leave/enter，直接取消高亮会闪烁。
//!   `drag_leave` 只记录一个到期时间点，`drag_enter` / `drag_over` 会清掉它，
//!   真正的取消由 `poll_timers` 在到期后执行。
//! - 每个用途只有一个待触发时间点，重复调度直接覆盖。
//! - 放下结果以 `DropOutcome` 返回，也可通过 `DropHandler` 以回调形式分发。

mod config;
mod payload;

use std::time::Instant;

use serde::Serialize;

pub use config::{DEFAULT_INVALID_FILE_MESSAGE, DEFAULT_LEAVE_DEBOUNCE, DropTargetConfig};
pub use payload::{DragItemKind, DragPayload, DropEffect, DropHandler, DropOutcome, DroppedFile};

/// 提供给展示层的拖放区状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTargetState {
    pub is_active: bool,
}

/// 拖放区状态机。
#[derive(Debug)]
pub struct DropTarget {
    config: DropTargetConfig,
    is_active: bool,
    deactivate_at: Option<Instant>,
}

impl DropTarget {
    pub fn new(config: DropTargetConfig) -> Self {
        Self {
            config,
            is_active: false,
            deactivate_at: None,
        }
    }

    pub fn config(&self) -> &DropTargetConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DropTargetConfig) {
        self.config = config;
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.config.disabled = disabled;
    }

    pub fn state(&self) -> DropTargetState {
        DropTargetState {
            is_active: self.is_active,
        }
    }

    /// 拖入。禁用或不含文件时忽略；否则取消待执行的取消高亮并进入 `Active`。
    ///
    /// 返回状态是否变化。
    pub fn drag_enter(&mut self, payload: &DragPayload) -> bool {
        if self.config.disabled || !payload.has_file() {
            return false;
        }

        self.deactivate_at = None;
        let changed = !self.is_active;
        self.is_active = true;
        if changed {
            log::debug!("拖放区激活");
        }
        changed
    }

    /// 悬停。取消待执行的取消高亮，并给出光标效果。
    pub fn drag_over(&mut self, payload: &DragPayload) -> DropEffect {
        self.deactivate_at = None;
        if payload.has_file() {
            DropEffect::Copy
        } else {
            DropEffect::None
        }
    }

    /// 离开。只安排取消高亮，去抖时长内再次拖入会撤销它。
    pub fn drag_leave(&mut self, now: Instant) {
        self.deactivate_at = Some(now + self.config.leave_debounce);
    }

    /// 放下。
    ///
    /// 禁用时什么都不做；否则无条件取消高亮，
    /// 恰好一个文件且文件名匹配才接受，其余情况（0 个、多个、不匹配）一律拒绝。
    pub fn drop<F: DroppedFile>(&mut self, files: Vec<F>) -> DropOutcome<F> {
        if self.config.disabled {
            log::debug!("拖放区已禁用，忽略放下");
            return DropOutcome::Ignored;
        }

        self.is_active = false;
        self.deactivate_at = None;

        let count = files.len();
        let mut files = files.into_iter();
        match (files.next(), files.next()) {
            (Some(file), None) if self.config.filename_pattern.is_match(&file.file_name()) => {
                log::debug!("接受文件 {}", file.file_name());
                DropOutcome::Accepted(file)
            }
            (Some(file), None) => {
                log::warn!("🚫 文件名不匹配 {}：{}", self.config.filename_pattern, file.file_name());
                DropOutcome::Rejected(self.config.invalid_file_message.clone())
            }
            _ => {
                log::warn!("🚫 放下了 {} 个文件，只接受单个文件", count);
                DropOutcome::Rejected(self.config.invalid_file_message.clone())
            }
        }
    }

    /// 放下并以回调形式分发结果。
    pub fn handle_drop<F, H>(&mut self, files: Vec<F>, handler: &mut H)
    where
        F: DroppedFile,
        H: DropHandler<F> + ?Sized,
    {
        self.drop(files).dispatch(handler);
    }

    /// 待执行的取消高亮时间点。
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deactivate_at
    }

    /// 执行到期的取消高亮，返回状态是否变化。
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        match self.deactivate_at {
            Some(at) if at <= now => {
                self.deactivate_at = None;
                let changed = self.is_active;
                self.is_active = false;
                if changed {
                    log::debug!("拖放区取消激活");
                }
                changed
            }
            _ => false,
        }
    }
}

impl Default for DropTarget {
    fn default() -> Self {
        Self::new(DropTargetConfig::default())
    }
}
