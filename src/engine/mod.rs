// ==========================================
// 设备停机 OEE 分析引擎 - 引擎层
// ==========================================
// 职责: 班次时钟、区间重建、指标计算、帕累托、洞察
// 红线: 引擎不做 I/O,全部为纯计算,now 显式传入
// ==========================================

pub mod insight;
pub mod interval_reconstructor;
pub mod metrics_calculator;
pub mod orchestrator;
pub mod pareto;
pub mod shift_clock;

// 重导出核心引擎
pub use insight::{format_duration_ms, summarize_fleet, worst_performer, InsightGenerator};
pub use interval_reconstructor::{IntervalReconstructor, Reconstruction};
pub use metrics_calculator::{MetricsCalculator, OeeBreakdown};
pub use orchestrator::{AnalyticsEngine, AnalyticsReport, ReplayStats};
pub use pareto::ParetoAnalyzer;
