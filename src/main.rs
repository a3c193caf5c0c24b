// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # Data URL 生成工具 — 应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use data_url_drop::desktop;
use tauri::Manager;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            log::info!("setup: begin");

            // 挂载调度器并注册为托管状态
            let handle = app.handle().clone();
            if let Err(err) = desktop::init(&handle) {
                log::error!("setup: 调度器挂载失败: {err}");
                return Err(err.into());
            }
            log::info!("setup: dispatcher mounted");

            if let Some(main_window) = app.get_webview_window("main") {
                if let Err(err) = main_window.set_focus() {
                    log::warn!("setup: 主窗口聚焦失败: {err}");
                }
            }

            log::info!("setup: complete");
            Ok(())
        })
        // 原生拖放事件交给拖放区状态机
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::DragDrop(drag_event) = event {
                desktop::forward_drag_drop(window.app_handle(), drag_event);
            }
        })
        .invoke_handler(tauri::generate_handler![
            desktop::submit_text,
            desktop::submit_pasted_file,
            desktop::pick_file,
            desktop::copy_output,
            desktop::get_pipeline_state,
            desktop::get_app_settings,
            desktop::set_app_settings,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
