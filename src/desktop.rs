//! # 桌面端适配层（desktop 特性）
//!
//! ## 设计思路
//!
//! Tauri 只负责把平台事件翻译成 `AppEvent`，以及把状态快照推给 WebView：
//! - 窗口原生拖放事件 → `DragEnter / DragOver / Drop / DragLeave`
//! - 前端粘贴、文件选择、复制按钮 → 对应命令
//! - 调度器状态变化 → `pipeline-state` / `drop-target-state` / `notice` 事件
//!
//! 命令层保持薄封装，业务逻辑都在调度器与流水线里。

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tauri::{AppHandle, DragDropEvent, Emitter, Manager, State, Wry};
use tauri_plugin_dialog::DialogExt;

use crate::dispatcher::{AppEvent, Dispatcher, EventSender, MountedApp, PasteData, StateObserver};
use crate::drop_target::{DragPayload, DropEffect, DropTargetState};
use crate::error::AppError;
use crate::ingest::{ArboardClipboard, MemoryFile, PipelineState};
use crate::notify::{LogNotifier, Notice, Notifier};
use crate::settings::AppSettings;

pub const PIPELINE_STATE_EVENT: &str = "pipeline-state";
pub const DROP_TARGET_STATE_EVENT: &str = "drop-target-state";
pub const DROP_EFFECT_EVENT: &str = "drop-effect";
pub const NOTICE_EVENT: &str = "notice";

/// 桌面端托管状态。
pub struct DesktopState {
    app: MountedApp,
    settings_dir: PathBuf,
    last_pipeline_state: Arc<Mutex<Option<PipelineState>>>,
    last_drag_payload: Mutex<DragPayload>,
}

impl DesktopState {
    fn sender(&self) -> EventSender {
        self.app.sender()
    }

    fn accepts_input(&self) -> bool {
        self.last_pipeline_state
            .lock()
            .map(|guard| guard.as_ref().is_none_or(PipelineState::accepts_input))
            .unwrap_or(true)
    }

    fn send(&self, event: AppEvent) -> Result<(), AppError> {
        if self.app.send(event) {
            Ok(())
        } else {
            Err(AppError::NotMounted)
        }
    }
}

struct WebviewObserver {
    app: AppHandle<Wry>,
    last_pipeline_state: Arc<Mutex<Option<PipelineState>>>,
}

impl StateObserver for WebviewObserver {
    fn on_pipeline_state(&self, state: &PipelineState) {
        if let Ok(mut guard) = self.last_pipeline_state.lock() {
            *guard = Some(state.clone());
        }
        if let Err(err) = self.app.emit(PIPELINE_STATE_EVENT, state) {
            log::warn!("发送流水线状态事件失败: {}", err);
        }
    }

    fn on_drop_target_state(&self, state: DropTargetState) {
        if let Err(err) = self.app.emit(DROP_TARGET_STATE_EVENT, state) {
            log::warn!("发送拖放区状态事件失败: {}", err);
        }
    }

    fn on_drop_effect(&self, effect: DropEffect) {
        if let Err(err) = self.app.emit(DROP_EFFECT_EVENT, effect) {
            log::warn!("发送光标效果事件失败: {}", err);
        }
    }
}

struct WebviewNotifier {
    app: AppHandle<Wry>,
}

impl Notifier for WebviewNotifier {
    fn notify(&self, notice: Notice) {
        LogNotifier.notify(notice.clone());
        if let Err(err) = self.app.emit(NOTICE_EVENT, notice) {
            log::warn!("发送提示事件失败: {}", err);
        }
    }
}

/// 读取设置、挂载调度器并注册为托管状态。
pub fn init(app: &AppHandle<Wry>) -> Result<(), AppError> {
    let settings_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Settings(format!("获取应用数据目录失败: {}", e)))?;

    let settings = match AppSettings::load(&settings_dir) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("读取设置失败，使用默认设置: {}", err);
            AppSettings::default()
        }
    };

    let ingest = settings.ingest_config()?;
    let drop_target = settings.drop_target_config()?;
    let last_pipeline_state = Arc::new(Mutex::new(None));

    let observer = WebviewObserver {
        app: app.clone(),
        last_pipeline_state: Arc::clone(&last_pipeline_state),
    };
    let notifier = WebviewNotifier { app: app.clone() };

    let mounted = tauri::async_runtime::block_on(async move {
        Dispatcher::mount(
            ingest,
            drop_target,
            Arc::new(ArboardClipboard),
            Box::new(notifier),
            Box::new(observer),
        )
    });

    app.manage(DesktopState {
        app: mounted,
        settings_dir,
        last_pipeline_state,
        last_drag_payload: Mutex::new(DragPayload::default()),
    });
    Ok(())
}

/// 把窗口原生拖放事件转为调度器事件。
pub fn forward_drag_drop(app: &AppHandle<Wry>, event: &DragDropEvent) {
    let Some(state) = app.try_state::<DesktopState>() else {
        return;
    };
    let sender = state.sender();

    match event {
        DragDropEvent::Enter { paths, .. } => {
            let payload = DragPayload::files(paths.len());
            if let Ok(mut guard) = state.last_drag_payload.lock() {
                *guard = payload.clone();
            }
            sender.send(AppEvent::DragEnter(payload));
        }
        DragDropEvent::Over { .. } => {
            let payload = state
                .last_drag_payload
                .lock()
                .map(|guard| guard.clone())
                .unwrap_or_default();
            sender.send(AppEvent::DragOver(payload));
        }
        DragDropEvent::Drop { paths, .. } => {
            sender.send(AppEvent::Drop(paths.clone()));
        }
        DragDropEvent::Leave => {
            sender.send(AppEvent::DragLeave);
        }
        _ => {}
    }
}

/// 粘贴文本。
#[tauri::command]
pub fn submit_text(state: State<'_, DesktopState>, text: String) -> Result<(), AppError> {
    state.send(AppEvent::Paste(PasteData::Text(text)))
}

/// 粘贴文件（前端读出的字节）。
#[tauri::command]
pub fn submit_pasted_file(
    state: State<'_, DesktopState>,
    name: String,
    mime_type: String,
    data: Vec<u8>,
) -> Result<(), AppError> {
    let file = MemoryFile::new(name, mime_type, data);
    state.send(AppEvent::Paste(PasteData::Files(vec![Box::new(file)])))
}

/// 打开系统文件选择器，选中后投递 `FilePicked`。加载中直接返回。
#[tauri::command]
pub fn pick_file(app: AppHandle<Wry>, state: State<'_, DesktopState>) -> Result<(), AppError> {
    let sender = state.sender();
    if sender.is_closed() {
        return Err(AppError::NotMounted);
    }
    if !state.accepts_input() {
        log::debug!("⏳ 读取进行中，不打开文件选择器");
        return Ok(());
    }

    app.dialog().file().pick_file(move |picked| {
        let Some(path) = picked.and_then(|p| p.as_path().map(|p| p.to_path_buf())) else {
            log::debug!("文件选择已取消");
            return;
        };
        sender.send(AppEvent::FilePicked(vec![path]));
    });
    Ok(())
}

/// 复制当前 Data URL。
#[tauri::command]
pub fn copy_output(state: State<'_, DesktopState>) -> Result<(), AppError> {
    state.send(AppEvent::CopyRequested)
}

/// 最近一次推送的流水线状态。
#[tauri::command]
pub fn get_pipeline_state(state: State<'_, DesktopState>) -> Result<Option<PipelineState>, AppError> {
    state
        .last_pipeline_state
        .lock()
        .map(|guard| guard.clone())
        .map_err(|_| AppError::Window("状态缓存锁已中毒".to_string()))
}

#[tauri::command]
pub fn get_app_settings(state: State<'_, DesktopState>) -> Result<AppSettings, AppError> {
    AppSettings::load(&state.settings_dir)
}

/// 保存设置并立即生效。
#[tauri::command]
pub fn set_app_settings(state: State<'_, DesktopState>, settings: AppSettings) -> Result<(), AppError> {
    settings.save(&state.settings_dir)?;
    state.send(AppEvent::Reconfigure {
        ingest: settings.ingest_config()?,
        drop_target: settings.drop_target_config()?,
    })
}
