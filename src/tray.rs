// 系统托盘
// 提供 Show / Quit 菜单，左键单击托盘图标显示主窗口

use tauri::{
    menu::{Menu, MenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    Manager,
};

use crate::router::AppView;

const MENU_SHOW: &str = "show";
const MENU_QUIT: &str = "quit";

pub fn create_tray(app: &tauri::App) -> tauri::Result<()> {
    let quit_i = MenuItem::with_id(app, MENU_QUIT, "Quit", true, None::<&str>)?;
    let show_i = MenuItem::with_id(app, MENU_SHOW, "Show", true, None::<&str>)?;
    let menu = Menu::with_items(app, &[&show_i, &quit_i])?;

    let mut tray = TrayIconBuilder::new()
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match event.id.as_ref() {
            MENU_QUIT => app.exit(0),
            MENU_SHOW => focus_main_window(app),
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                focus_main_window(tray.app_handle());
            }
        });

    if let Some(icon) = app.default_window_icon() {
        tray = tray.icon(icon.clone());
    }

    tray.build(app)?;
    Ok(())
}

/// 直接显示已加载的主窗口，不重新导航
fn focus_main_window(app: &tauri::AppHandle) {
    if let Some(window) = app.get_webview_window(AppView::Main.label()) {
        let _ = window.show();
        let _ = window.set_focus();
    }
}
