// 自动更新命令

use tauri::State;

use crate::updater::{UpdaterSnapshot, UpdaterState};

/// 获取更新视图的当前状态
/// 前端挂载时先取一次快照，之后监听 `updater://status` 事件
#[tauri::command]
#[specta::specta]
pub fn updater_status(state: State<'_, UpdaterState>) -> Option<UpdaterSnapshot> {
    state.snapshot()
}
