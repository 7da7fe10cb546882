// ==========================================
// 设备停机 OEE 分析引擎 - 数据源 Trait
// ==========================================
// 职责: 定义分析所需输入的读取接口（不包含实现）
// 红线: 只读，不包含写入、不包含分析逻辑
// ==========================================

use crate::domain::machine::{Machine, StatusChangeEvent};
use crate::domain::work_hours::WorkHoursConfig;
use crate::source::error::DataSourceResult;
use async_trait::async_trait;

// ==========================================
// AnalyticsDataSource Trait
// ==========================================
// 实现者: InMemoryDataSource / FileDataSource / FallbackDataSource
#[async_trait]
pub trait AnalyticsDataSource: Send + Sync {
    /// 读取设备快照
    ///
    /// # 返回
    /// - Vec<Machine>: 按来源顺序，指标输出沿用此顺序
    async fn load_machines(&self) -> DataSourceResult<Vec<Machine>>;

    /// 读取状态事件日志
    ///
    /// # 返回
    /// - Vec<StatusChangeEvent>: 不保证时间有序
    async fn load_events(&self) -> DataSourceResult<Vec<StatusChangeEvent>>;

    /// 读取班次配置
    ///
    /// # 默认值
    /// - 未配置时为 WorkHoursConfig::default()（不启用班次）
    async fn load_work_hours(&self) -> DataSourceResult<WorkHoursConfig>;

    /// 数据源名称（日志用）
    fn name(&self) -> &str;
}
