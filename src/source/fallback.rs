// ==========================================
// 设备停机 OEE 分析引擎 - 降级数据源
// ==========================================
// 主数据源读取失败时，逐项切换到备用数据源
// 备用也失败时返回主数据源的错误
// ==========================================

use crate::domain::machine::{Machine, StatusChangeEvent};
use crate::domain::work_hours::WorkHoursConfig;
use crate::source::data_source::AnalyticsDataSource;
use crate::source::error::DataSourceResult;
use async_trait::async_trait;
use tracing::warn;

pub struct FallbackDataSource<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackDataSource<P, S>
where
    P: AnalyticsDataSource,
    S: AnalyticsDataSource,
{
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

macro_rules! with_fallback {
    ($self:ident, $method:ident, $what:expr) => {
        match $self.primary.$method().await {
            Ok(value) => Ok(value),
            Err(primary_err) => {
                warn!(
                    source = $self.primary.name(),
                    fallback = $self.secondary.name(),
                    error = %primary_err,
                    "{}读取失败，切换备用数据源",
                    $what
                );
                $self.secondary.$method().await.map_err(|secondary_err| {
                    warn!(error = %secondary_err, "备用数据源同样失败");
                    primary_err
                })
            }
        }
    };
}

#[async_trait]
impl<P, S> AnalyticsDataSource for FallbackDataSource<P, S>
where
    P: AnalyticsDataSource,
    S: AnalyticsDataSource,
{
    async fn load_machines(&self) -> DataSourceResult<Vec<Machine>> {
        with_fallback!(self, load_machines, "设备快照")
    }

    async fn load_events(&self) -> DataSourceResult<Vec<StatusChangeEvent>> {
        with_fallback!(self, load_events, "事件日志")
    }

    async fn load_work_hours(&self) -> DataSourceResult<WorkHoursConfig> {
        with_fallback!(self, load_work_hours, "班次配置")
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}
