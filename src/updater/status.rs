use serde::Serialize;

/// 更新中的 spinner 颜色
pub const ACCENT_UPDATING: &str = "#4dff4d";
/// 其余状态的 spinner 颜色
pub const ACCENT_IDLE: &str = "#ff4d4d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, specta::Type)]
#[serde(rename_all = "camelCase")]
pub enum UpdatePhase {
    Checking,
    Updating,
    UpToDate,
    Failed,
}

/// 更新视图状态，Checking 之外的状态都是终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Checking,
    Updating { version: String },
    UpToDate,
    Failed,
}

impl UpdateStatus {
    pub fn phase(&self) -> UpdatePhase {
        match self {
            UpdateStatus::Checking => UpdatePhase::Checking,
            UpdateStatus::Updating { .. } => UpdatePhase::Updating,
            UpdateStatus::UpToDate => UpdatePhase::UpToDate,
            UpdateStatus::Failed => UpdatePhase::Failed,
        }
    }

    pub fn text(&self) -> String {
        match self {
            UpdateStatus::Checking => "Checking for updates...".to_string(),
            UpdateStatus::Updating { version } => format!("Updating to {}...", version),
            UpdateStatus::UpToDate => "Up to date!".to_string(),
            UpdateStatus::Failed => "Update check failed. Starting app...".to_string(),
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            UpdateStatus::Updating { .. } => ACCENT_UPDATING,
            _ => ACCENT_IDLE,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            UpdateStatus::Updating { version } => Some(version),
            _ => None,
        }
    }
}

/// 推送给更新窗口的状态快照
#[derive(Debug, Clone, PartialEq, Serialize, specta::Type)]
#[serde(rename_all = "camelCase")]
pub struct UpdaterSnapshot {
    pub phase: UpdatePhase,
    pub status: String,
    pub accent: String,
    pub version: Option<String>,
    pub downloaded: String,  // 使用字符串表示大数字
    pub content_length: Option<String>,  // 使用字符串表示大数字
}

impl UpdaterSnapshot {
    pub fn new(status: &UpdateStatus) -> Self {
        Self {
            phase: status.phase(),
            status: status.text(),
            accent: status.accent().to_string(),
            version: status.version().map(str::to_string),
            downloaded: "0".to_string(),
            content_length: None,
        }
    }

    /// 更新下载计数
    pub fn set_progress(&mut self, downloaded: u64, content_length: Option<u64>) {
        self.downloaded = downloaded.to_string();
        self.content_length = content_length.map(|length| length.to_string());
    }

    /// 切换状态，保留已有的下载计数
    pub fn apply(&mut self, status: &UpdateStatus) {
        self.phase = status.phase();
        self.status = status.text();
        self.accent = status.accent().to_string();
        self.version = status.version().map(str::to_string);
    }
}

impl Default for UpdaterSnapshot {
    fn default() -> Self {
        Self::new(&UpdateStatus::Checking)
    }
}
