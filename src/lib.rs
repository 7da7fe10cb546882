// ==========================================
// 设备停机 OEE 分析引擎 - 核心库
// ==========================================
// 输入: 设备快照 + 状态事件日志 + 班次配置
// 输出: 单机 OEE/MTBF/MTTR、停机原因帕累托、洞察提示
// 系统定位: 只读分析，不写回任何数据
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分析计算
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 数据源层 - 输入读取
pub mod source;

// API 层 - 数据源 + 引擎
pub mod api;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AnalysisWindow, CycleTimeUnit, InsightKind, MachineState, MachineStatus};

// 领域实体
pub use domain::{
    DowntimeInterval, FleetSummary, Insight, Machine, MachineMetrics, ParetoItem,
    StatusChangeEvent, WorkHoursConfig,
};

// 引擎
pub use engine::{
    AnalyticsEngine, AnalyticsReport, InsightGenerator, IntervalReconstructor, MetricsCalculator,
    ParetoAnalyzer,
};

// 配置
pub use config::{AnalyticsConfig, ConfigManager};

// 数据源
pub use source::{AnalyticsDataSource, FallbackDataSource, FileDataSource, InMemoryDataSource};

// API
pub use api::{AnalyticsApi, ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备停机 OEE 分析引擎";
