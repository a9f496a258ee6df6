// 窗口路由
// 根据窗口标签决定前端渲染哪个视图

use serde::{Deserialize, Serialize};

/// 更新窗口的保留标签
pub const UPDATER_WINDOW_LABEL: &str = "updater";
/// 主窗口标签
pub const MAIN_WINDOW_LABEL: &str = "main";

/// 窗口对应的顶层视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, specta::Type)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    Updater,
    Main,
}

impl AppView {
    pub fn label(self) -> &'static str {
        match self {
            AppView::Updater => UPDATER_WINDOW_LABEL,
            AppView::Main => MAIN_WINDOW_LABEL,
        }
    }
}

/// 只有保留的 updater 标签进入更新视图，其余全部进入主视图
pub fn select_view(label: &str) -> AppView {
    if label == UPDATER_WINDOW_LABEL {
        AppView::Updater
    } else {
        AppView::Main
    }
}
