// ==========================================
// 设备停机 OEE 分析引擎 - 内存数据源
// ==========================================
// 用途: 嵌入调用方与测试，直接持有已加载的数据
// ==========================================

use crate::domain::machine::{Machine, StatusChangeEvent};
use crate::domain::work_hours::WorkHoursConfig;
use crate::source::data_source::AnalyticsDataSource;
use crate::source::error::DataSourceResult;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    machines: Vec<Machine>,
    events: Vec<StatusChangeEvent>,
    work_hours: WorkHoursConfig,
}

impl InMemoryDataSource {
    pub fn new(
        machines: Vec<Machine>,
        events: Vec<StatusChangeEvent>,
        work_hours: WorkHoursConfig,
    ) -> Self {
        Self {
            machines,
            events,
            work_hours,
        }
    }
}

#[async_trait]
impl AnalyticsDataSource for InMemoryDataSource {
    async fn load_machines(&self) -> DataSourceResult<Vec<Machine>> {
        Ok(self.machines.clone())
    }

    async fn load_events(&self) -> DataSourceResult<Vec<StatusChangeEvent>> {
        Ok(self.events.clone())
    }

    async fn load_work_hours(&self) -> DataSourceResult<WorkHoursConfig> {
        Ok(self.work_hours)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
