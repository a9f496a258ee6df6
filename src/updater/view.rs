use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use super::error::UpdaterError;
use super::events::{DownloadEvent, DownloadTracker};
use super::host::{DownloadEventSink, UpdateHost};
use super::status::{UpdateStatus, UpdaterSnapshot};
use super::timer::ScopedTimer;
use crate::config::UpdaterConfig;

/// `UpdateView::run` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 已是最新版本，主窗口将在延迟后显示
    UpToDate,
    /// 更新已安装，进程正在重启
    Restarting,
    /// 检查或安装失败，主窗口将在延迟后显示
    Failed,
    /// 流程已经执行过
    AlreadyStarted,
}

/// 更新视图控制器
/// 执行一次检查/安装流程，并通过 watch 通道发布状态快照
pub struct UpdateView<H: UpdateHost> {
    host: Arc<H>,
    config: UpdaterConfig,
    status: Arc<watch::Sender<UpdaterSnapshot>>,
    started: AtomicBool,
    torn_down: AtomicBool,
    reveal: Mutex<Option<ScopedTimer>>,
}

impl<H: UpdateHost> UpdateView<H> {
    pub fn new(host: Arc<H>, config: UpdaterConfig) -> Self {
        let (status, _) = watch::channel(UpdaterSnapshot::default());
        Self {
            host,
            config,
            status: Arc::new(status),
            started: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            reveal: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UpdaterSnapshot> {
        self.status.subscribe()
    }

    pub fn snapshot(&self) -> UpdaterSnapshot {
        self.status.borrow().clone()
    }

    /// 执行更新流程，每个视图只会真正执行一次
    pub async fn run(&self) -> UpdateOutcome {
        if self.started.swap(true, Ordering::SeqCst) {
            log::warn!("Update check already started for this view");
            return UpdateOutcome::AlreadyStarted;
        }

        log::info!("Checking for updates");

        match self.check_and_install().await {
            Ok(false) => {
                log::info!("No update found");
                self.finish_with(UpdateStatus::UpToDate, self.config.up_to_date_delay);
                UpdateOutcome::UpToDate
            }
            Ok(true) => UpdateOutcome::Restarting,
            Err(e) => {
                log::error!("Update check failed: {}", e);
                self.finish_with(UpdateStatus::Failed, self.config.failure_delay);
                UpdateOutcome::Failed
            }
        }
    }

    /// 卸载视图：取消尚未执行的主窗口显示任务，之后也不再调度新的任务
    pub fn teardown(&self) {
        if let Ok(mut slot) = self.reveal.lock() {
            self.torn_down.store(true, Ordering::SeqCst);
            if let Some(mut timer) = slot.take() {
                if timer.is_pending() {
                    log::info!("Cancelling pending main window reveal");
                }
                timer.cancel();
            }
        }
    }

    /// 返回 true 表示已安装更新并请求了重启
    async fn check_and_install(&self) -> Result<bool, UpdaterError> {
        let update = match self.host.check_for_update().await? {
            Some(update) => update,
            None => return Ok(false),
        };

        let descriptor = self.host.describe(&update);
        log::info!(
            "Update found: {} (current {})",
            descriptor.version,
            descriptor.current_version
        );
        self.set_status(UpdateStatus::Updating {
            version: descriptor.version,
        });

        let tracker = Arc::new(Mutex::new(DownloadTracker::new()));
        self.host
            .download_and_install(update, self.progress_sink(Arc::clone(&tracker)))
            .await?;

        let downloaded = tracker
            .lock()
            .map_err(|_| UpdaterError::Install("download tracker poisoned".to_string()))?
            .complete()?;
        log::info!("Update installed ({} bytes downloaded)", downloaded);

        self.host.restart_process().await?;
        Ok(true)
    }

    fn progress_sink(&self, tracker: Arc<Mutex<DownloadTracker>>) -> DownloadEventSink {
        let status = Arc::clone(&self.status);

        Box::new(move |event: DownloadEvent| {
            let Ok(mut tracker) = tracker.lock() else {
                return;
            };

            if let Err(e) = tracker.record(&event) {
                log::warn!("Rejected download event: {}", e);
                return;
            }

            match &event {
                DownloadEvent::Started { content_length } => {
                    log::info!("Started downloading {} bytes", content_length.unwrap_or(0));
                }
                DownloadEvent::Progress { .. } => {
                    log::info!(
                        "Downloaded {} from {}",
                        tracker.downloaded(),
                        tracker.content_length().unwrap_or(0)
                    );
                }
                DownloadEvent::Finished => log::info!("Download finished"),
            }

            let downloaded = tracker.downloaded();
            let content_length = tracker.content_length();
            status.send_modify(|snapshot| snapshot.set_progress(downloaded, content_length));
        })
    }

    fn set_status(&self, status: UpdateStatus) {
        log::info!("Updater status: {}", status.text());
        self.status.send_modify(|snapshot| snapshot.apply(&status));
    }

    /// 进入终态并调度主窗口显示；视图已卸载时两者都跳过
    fn finish_with(&self, status: UpdateStatus, delay: Duration) {
        // 持锁检查，保证与 teardown 互斥
        let Ok(mut slot) = self.reveal.lock() else {
            return;
        };
        if self.torn_down.load(Ordering::SeqCst) {
            log::info!("Update view torn down, skipping main window reveal");
            return;
        }

        self.set_status(status);

        let host = Arc::clone(&self.host);
        *slot = Some(ScopedTimer::schedule(delay, async move {
            if let Err(e) = host.reveal_main_window().await {
                log::error!("Failed to show main window: {}", e);
            }
        }));
    }
}
