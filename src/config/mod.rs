// ==========================================
// 设备停机 OEE 分析引擎 - 配置层
// ==========================================
// 职责: 引擎阈值与统计窗口管理,支持文件与环境变量覆写
// 存储: 扁平 key-value
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, AnalyticsConfig, ConfigError, ConfigManager};
