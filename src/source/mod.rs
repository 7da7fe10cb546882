// ==========================================
// 设备停机 OEE 分析引擎 - 数据源层
// ==========================================
// 职责: 读取设备快照、事件日志、班次配置
// 红线: 数据源只读，不做分析计算
// ==========================================

pub mod data_source;
pub mod error;
pub mod fallback;
pub mod file_source;
pub mod memory;

pub use data_source::AnalyticsDataSource;
pub use error::{DataSourceError, DataSourceResult};
pub use fallback::FallbackDataSource;
pub use file_source::{parse_events_csv, parse_timestamp, FileDataSource};
pub use memory::InMemoryDataSource;
