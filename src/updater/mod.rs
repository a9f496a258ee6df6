// 自动更新模块
// 更新窗口打开时执行一次检查/安装流程，状态通过事件推送给前端

pub mod error;
pub mod events;
pub mod host;
pub mod status;
pub mod tauri_host;
pub mod timer;
pub mod view;

pub use error::UpdaterError;
pub use events::{DownloadEvent, DownloadTracker};
pub use host::{DownloadEventSink, UpdateDescriptor, UpdateHost};
pub use status::{UpdatePhase, UpdateStatus, UpdaterSnapshot};
pub use tauri_host::TauriHost;
pub use view::{UpdateOutcome, UpdateView};

use std::sync::{Arc, Mutex};
use tauri::{Emitter, Manager};

use crate::config::AppConfig;
use crate::router::AppView;

/// 推送给更新窗口的状态事件名
pub const STATUS_EVENT: &str = "updater://status";

/// 当前挂载的更新视图
#[derive(Default)]
pub struct UpdaterState {
    view: Mutex<Option<Arc<UpdateView<TauriHost>>>>,
}

impl UpdaterState {
    pub fn snapshot(&self) -> Option<UpdaterSnapshot> {
        self.view
            .lock()
            .ok()
            .and_then(|view| view.as_ref().map(|view| view.snapshot()))
    }

    /// 卸载视图并取消其延迟任务
    pub fn teardown(&self) {
        let view = self.view.lock().ok().and_then(|mut view| view.take());
        if let Some(view) = view {
            view.teardown();
        }
    }

    fn mount(&self, view: Arc<UpdateView<TauriHost>>) -> bool {
        match self.view.lock() {
            Ok(mut slot) if slot.is_none() => {
                *slot = Some(view);
                true
            }
            _ => false,
        }
    }
}

/// 为更新窗口挂载视图并启动更新流程
pub fn mount_update_view(app: &tauri::AppHandle, config: AppConfig) {
    let updater_config = config.updater.clone();
    let host = Arc::new(TauriHost::new(app.clone(), config));
    let view = Arc::new(UpdateView::new(host, updater_config));

    let state = app.state::<UpdaterState>();
    if !state.mount(Arc::clone(&view)) {
        log::warn!("Update view already mounted");
        return;
    }

    // 状态变化时推送到更新窗口
    let mut status_rx = view.subscribe();
    let app_handle = app.clone();
    tauri::async_runtime::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let snapshot = status_rx.borrow_and_update().clone();
            if let Err(e) = app_handle.emit_to(AppView::Updater.label(), STATUS_EVENT, &snapshot) {
                log::warn!("Failed to emit updater status: {}", e);
            }
        }
    });

    tauri::async_runtime::spawn(async move {
        let outcome = view.run().await;
        log::info!("Update check finished: {:?}", outcome);
    });
}
