// ==========================================
// 设备停机 OEE 分析引擎 - 领域模型层
// ==========================================
// 职责: 定义设备快照、状态事件、班次配置与派生输出
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod downtime;
pub mod machine;
pub mod metrics;
pub mod types;
pub mod work_hours;

// 重导出核心类型
pub use downtime::{DowntimeInterval, ParetoItem, UNKNOWN_REASON};
pub use machine::{Machine, StatusChangeEvent, DEFAULT_CYCLE_TIME_SECONDS};
pub use metrics::{FleetSummary, Insight, MachineMetrics};
pub use types::{AnalysisWindow, CycleTimeUnit, InsightKind, MachineState, MachineStatus};
pub use work_hours::WorkHoursConfig;
