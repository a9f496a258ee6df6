/// 更新流程错误类型
///
/// 检查失败与安装失败对用户呈现相同的回退行为，这里仍然分开记录以便排查日志
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdaterError {
    #[error("Update check failed: {0}")]
    Check(String),

    #[error("Update install failed: {0}")]
    Install(String),

    #[error("Window operation failed: {0}")]
    Window(String),

    #[error("Unknown download event: {0}")]
    UnknownEvent(String),

    #[error("Malformed download event: {0}")]
    MalformedEvent(String),

    #[error("Download events out of order: {0}")]
    EventOrder(String),
}
