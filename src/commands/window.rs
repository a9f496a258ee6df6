// 窗口控制命令
// 提供主窗口显示、应用重启、连通性检测与窗口视图解析

use tauri::{Manager, State};

use crate::config::AppConfig;
use crate::router::{select_view, AppView, MAIN_WINDOW_LABEL, UPDATER_WINDOW_LABEL};
use crate::utils::connectivity;

/// 显示主窗口并关闭更新窗口
/// 在线时打开站点，离线时打开本地离线页面
pub async fn reveal_main_window(app: &tauri::AppHandle, config: &AppConfig) -> Result<(), String> {
    let main_window = app
        .get_webview_window(MAIN_WINDOW_LABEL)
        .ok_or_else(|| "Main window not found".to_string())?;

    let online =
        connectivity::check_connection(&config.connectivity_addr, config.connectivity_timeout).await;
    let target = if online {
        config.site_url.clone()
    } else {
        config.offline_url.clone()
    };
    log::info!("Showing main window (online: {}) at {}", online, target);

    if let Err(e) = main_window.navigate(target) {
        log::warn!("Failed to navigate main window: {}", e);
    }
    if let Err(e) = main_window.show() {
        log::warn!("Failed to show main window: {}", e);
    }
    if let Err(e) = main_window.set_focus() {
        log::warn!("Failed to focus main window: {}", e);
    }

    if let Some(updater_window) = app.get_webview_window(UPDATER_WINDOW_LABEL) {
        if let Err(e) = updater_window.close() {
            log::warn!("Failed to close updater window: {}", e);
        }
    }

    Ok(())
}

/// 显示主窗口
#[tauri::command]
#[specta::specta]
pub async fn show_main_window(
    app: tauri::AppHandle,
    config: State<'_, AppConfig>,
) -> Result<(), String> {
    reveal_main_window(&app, &config).await
}

/// 重启应用，不会返回
#[tauri::command]
#[specta::specta]
pub fn restart_app(app: tauri::AppHandle) {
    log::info!("Restart requested from frontend");
    app.restart()
}

/// 检测站点是否可达
#[tauri::command]
#[specta::specta]
pub async fn check_connection(config: State<'_, AppConfig>) -> Result<bool, String> {
    Ok(
        connectivity::check_connection(&config.connectivity_addr, config.connectivity_timeout)
            .await,
    )
}

/// 解析调用方窗口应渲染的视图
#[tauri::command]
#[specta::specta]
pub fn window_view(window: tauri::Window) -> AppView {
    select_view(window.label())
}
