//! # Data URL 生成工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 前端 (WebView，仅负责渲染)                │
//! │     pipeline-state / drop-target-state / notice 事件      │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC（desktop 特性）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ dispatcher ── 单线程事件循环（拖放/粘贴/选择/复制）   │
//! │  │                                                       │
//! │  ├─ drop_target ─ 拖放区状态机 + 文件名校验 + 去抖        │
//! │  │                                                       │
//! │  ├─ ingest ────── 校验 → 异步读取 → Base64 → 类型判定     │
//! │  │   ├─ loader           磁盘/内存文件                    │
//! │  │   ├─ encoder          Data URL 编解码、文本分类         │
//! │  │   └─ clipboard_writer 系统剪贴板写入                   │
//! │  │                                                       │
//! │  ├─ notify ────── 用户提示出口                            │
//! │  ├─ settings ──── settings.json 读写与校验                │
//! │  └─ error ─────── AppError (统一错误类型)                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`drop_target`] | 拖入/离开/悬停/放下状态机，接受或拒绝放下的文件 |
//! | [`ingest`] | 文件与粘贴文本转 Data URL，加载态与复制确认态 |
//! | [`dispatcher`] | 把所有界面事件按顺序应用到拖放区与流水线 |
//! | [`notify`] | 面向用户的提示 |
//! | [`settings`] | 阈值、文件名规则等设置 |
//! | [`format`] | 字节大小格式化 |

pub mod dispatcher;
pub mod drop_target;
pub mod error;
pub mod format;
pub mod ingest;
pub mod notify;
pub mod settings;

#[cfg(feature = "desktop")]
pub mod desktop;
