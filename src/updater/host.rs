use async_trait::async_trait;
use serde::Serialize;

use super::error::UpdaterError;
use super::events::DownloadEvent;

/// 下载事件回调，由宿主按顺序同步调用
pub type DownloadEventSink = Box<dyn FnMut(DownloadEvent) + Send + 'static>;

/// 可用更新的描述信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, specta::Type)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptor {
    pub version: String,
    pub current_version: String,
    pub notes: Option<String>,
}

/// 宿主运行时提供的更新与窗口能力
#[async_trait]
pub trait UpdateHost: Send + Sync + 'static {
    /// 宿主侧用于执行安装的更新句柄
    type Update: Send + 'static;

    /// 检查更新，None 表示已是最新版本
    async fn check_for_update(&self) -> Result<Option<Self::Update>, UpdaterError>;

    fn describe(&self, update: &Self::Update) -> UpdateDescriptor;

    /// 下载并安装更新
    async fn download_and_install(
        &self,
        update: Self::Update,
        on_event: DownloadEventSink,
    ) -> Result<(), UpdaterError>;

    /// 重启进程，成功时不会返回
    async fn restart_process(&self) -> Result<(), UpdaterError>;

    async fn reveal_main_window(&self) -> Result<(), UpdaterError>;
}
