pub mod commands; // Tauri 命令模块 - 公开以便外部访问
pub mod config; // 应用配置
pub mod router; // 窗口视图路由
mod tray; // 系统托盘
pub mod updater; // 自动更新功能
mod utils; // 通用工具模块

use commands::*; // 导入所有命令
use config::AppConfig;
use router::{select_view, AppView, MAIN_WINDOW_LABEL, UPDATER_WINDOW_LABEL};
use tauri::Manager;
use tauri_specta::{collect_commands, Builder};
use updater::UpdaterState;

/// TypeScript 绑定输出路径，位于打包的前端目录之外
pub const BINDINGS_PATH: &str = "bindings/tauri-commands.ts";

// 页面加载时禁用右键菜单
const DISABLE_CONTEXT_MENU_JS: &str =
    "document.addEventListener('contextmenu', e => e.preventDefault());";

/// 创建统一的 tauri-specta Builder
/// 用于命令注册和类型导出
pub fn create_specta_builder() -> Builder<tauri::Wry> {
    Builder::<tauri::Wry>::new().commands(collect_commands![
        // 窗口控制命令
        show_main_window,
        restart_app,
        check_connection,
        window_view,
        // 自动更新命令
        updater_status
    ])
}

// 后台显示主窗口
fn spawn_reveal_main_window(app: &tauri::AppHandle) {
    let app_handle = app.clone();
    tauri::async_runtime::spawn(async move {
        let config = app_handle.state::<AppConfig>().inner().clone();
        if let Err(e) = reveal_main_window(&app_handle, &config).await {
            log::error!("Failed to show main window: {}", e);
        }
    });
}

// 处理第二个实例启动：更新流程进行中时聚焦更新窗口，否则显示主窗口
fn handle_second_instance(app: &tauri::AppHandle) {
    if let Some(updater_window) = app.get_webview_window(UPDATER_WINDOW_LABEL) {
        let _ = updater_window.set_focus();
    } else {
        spawn_reveal_main_window(app);
    }
}

// 处理深度链接：musifly://some/path -> https://open.musifly.net/some/path
fn handle_deep_link(app: &tauri::AppHandle, config: &AppConfig, urls: &[url::Url]) {
    let Some(url) = urls.first() else {
        return;
    };

    let Some(target) =
        utils::deep_link::deep_link_target(url.as_str(), &config.deep_link_scheme, &config.site_url)
    else {
        log::debug!("Ignoring deep link: {}", url);
        return;
    };

    if let Some(main_window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        log::info!("Opening deep link {} at {}", url, target);
        if let Err(e) = main_window.navigate(target) {
            log::warn!("Failed to navigate to deep link: {}", e);
            return;
        }
        let _ = main_window.show();
        let _ = main_window.set_focus();
    }
}

fn setup_deep_links(app: &tauri::App, config: &AppConfig) {
    use tauri_plugin_deep_link::DeepLinkExt;

    #[cfg(any(windows, target_os = "linux"))]
    if let Err(e) = app.deep_link().register(&config.deep_link_scheme) {
        log::warn!("Failed to register deep link scheme: {}", e);
    }

    let app_handle = app.handle().clone();
    let config = config.clone();
    app.deep_link().on_open_url(move |event| {
        handle_deep_link(&app_handle, &config, &event.urls());
    });
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = AppConfig::load_or_default();
    let builder = create_specta_builder();

    // 在开发模式下自动导出 TypeScript 绑定
    #[cfg(debug_assertions)]
    {
        use specta_typescript::Typescript;

        if let Err(e) = builder.export(
            Typescript::default().header("// @ts-nocheck"),
            BINDINGS_PATH,
        ) {
            log::warn!("Failed to export TypeScript bindings: {}", e);
        }
    }

    // 单实例插件需要最先注册
    let tauri_builder = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            handle_second_instance(app);
        }))
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_process::init())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_deep_link::init());

    let setup_config = config.clone();
    let tauri_builder = tauri_builder
        .manage(config)
        .manage(UpdaterState::default())
        .invoke_handler(builder.invoke_handler())
        .setup(move |app| {
            tray::create_tray(app)?;
            setup_deep_links(app, &setup_config);

            // 根据窗口标签决定是否挂载更新视图
            let has_updater = app
                .webview_windows()
                .keys()
                .any(|label| select_view(label) == AppView::Updater);

            if has_updater {
                updater::mount_update_view(app.handle(), setup_config.clone());
            } else {
                log::info!("No updater window configured, showing main window");
                spawn_reveal_main_window(app.handle());
            }

            Ok(())
        })
        .on_window_event(|window, event| match event {
            tauri::WindowEvent::CloseRequested { api, .. } => {
                // 只拦截主窗口的关闭，隐藏到托盘
                if window.label() == MAIN_WINDOW_LABEL {
                    api.prevent_close();
                    if let Err(e) = window.hide() {
                        log::warn!("Failed to hide main window: {}", e);
                    }
                }
            }
            tauri::WindowEvent::Destroyed => {
                if select_view(window.label()) == AppView::Updater {
                    window.state::<UpdaterState>().teardown();
                }
            }
            _ => {}
        })
        .on_page_load(|webview, _payload| {
            let _ = webview.eval(DISABLE_CONTEXT_MENU_JS);
        });

    tauri_builder
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_not_shipped_with_the_frontend() {
        let conf: serde_json::Value =
            serde_json::from_str(include_str!("../tauri.conf.json")).unwrap();
        let frontend_dist = conf["build"]["frontendDist"].as_str().unwrap();

        let bindings = std::path::Path::new(BINDINGS_PATH);
        assert!(!bindings.starts_with(frontend_dist));
    }
}
