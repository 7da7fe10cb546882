// ==========================================
// 设备停机 OEE 分析引擎 - API 层
// ==========================================
// 职责: 读取数据源并调用分析引擎，供命令行与嵌入方使用
// ==========================================

pub mod analytics_api;
pub mod error;

// 重导出核心类型
pub use analytics_api::AnalyticsApi;
pub use error::{ApiError, ApiResult};
