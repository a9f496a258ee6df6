use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tauri_plugin_updater::{Update, UpdaterExt};

use super::error::UpdaterError;
use super::events::DownloadEvent;
use super::host::{DownloadEventSink, UpdateDescriptor, UpdateHost};
use crate::commands::window::reveal_main_window;
use crate::config::AppConfig;

/// 基于 Tauri 运行时和 updater 插件的宿主实现
pub struct TauriHost {
    app: tauri::AppHandle,
    config: AppConfig,
}

impl TauriHost {
    pub fn new(app: tauri::AppHandle, config: AppConfig) -> Self {
        Self { app, config }
    }
}

#[async_trait]
impl UpdateHost for TauriHost {
    type Update = Update;

    async fn check_for_update(&self) -> Result<Option<Update>, UpdaterError> {
        let updater = self
            .app
            .updater()
            .map_err(|e| UpdaterError::Check(e.to_string()))?;

        updater
            .check()
            .await
            .map_err(|e| UpdaterError::Check(e.to_string()))
    }

    fn describe(&self, update: &Update) -> UpdateDescriptor {
        UpdateDescriptor {
            version: update.version.clone(),
            current_version: update.current_version.clone(),
            notes: update.body.clone(),
        }
    }

    async fn download_and_install(
        &self,
        update: Update,
        on_event: DownloadEventSink,
    ) -> Result<(), UpdaterError> {
        // 插件只提供分块回调和完成回调，Started 在第一个分块到达时补发
        let sink = Mutex::new(on_event);
        let started = AtomicBool::new(false);

        let emit = |event: DownloadEvent| {
            if let Ok(mut sink) = sink.lock() {
                (*sink)(event);
            }
        };

        update
            .download_and_install(
                |chunk_length, content_length| {
                    if !started.swap(true, Ordering::SeqCst) {
                        emit(DownloadEvent::Started { content_length });
                    }
                    emit(DownloadEvent::Progress {
                        chunk_length: chunk_length as u64,
                    });
                },
                || {
                    // 空下载也要保证 Started 在 Finished 之前
                    if !started.swap(true, Ordering::SeqCst) {
                        emit(DownloadEvent::Started {
                            content_length: None,
                        });
                    }
                    emit(DownloadEvent::Finished);
                },
            )
            .await
            .map_err(|e| UpdaterError::Install(e.to_string()))
    }

    async fn restart_process(&self) -> Result<(), UpdaterError> {
        log::info!("Restarting application");
        self.app.restart()
    }

    async fn reveal_main_window(&self) -> Result<(), UpdaterError> {
        reveal_main_window(&self.app, &self.config)
            .await
            .map_err(UpdaterError::Window)
    }
}
