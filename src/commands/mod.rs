// Tauri 命令模块
// 按功能分类组织所有前端可调用的命令

pub mod updater; // 自动更新命令
pub mod window; // 窗口控制命令

// 重新导出所有命令，便于在 lib.rs 中统一注册
pub use updater::*;
pub use window::*;
