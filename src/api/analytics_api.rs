// ==========================================
// 设备停机 OEE 分析引擎 - 分析 API
// ==========================================
// 架构: API 层 → 数据源 (AnalyticsDataSource) + 引擎 (AnalyticsEngine)
// 三类输入并发读取，全部成功后一次性计算
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AnalyticsConfig, ConfigManager};
use crate::domain::metrics::MachineMetrics;
use crate::domain::types::AnalysisWindow;
use crate::engine::orchestrator::{AnalyticsEngine, AnalyticsReport};
use crate::source::data_source::AnalyticsDataSource;

// ==========================================
// AnalyticsApi - 分析 API
// ==========================================
pub struct AnalyticsApi {
    source: Arc<dyn AnalyticsDataSource>,
    engine: AnalyticsEngine,
}

impl AnalyticsApi {
    /// 创建新的 AnalyticsApi 实例
    ///
    /// # 参数
    /// - source: 数据源
    /// - config: 引擎参数
    pub fn new(source: Arc<dyn AnalyticsDataSource>, config: AnalyticsConfig) -> Self {
        Self {
            source,
            engine: AnalyticsEngine::new(config),
        }
    }

    /// 从配置文件创建（文件 → 环境变量覆写）
    ///
    /// # 返回
    /// - Err(ApiError::Config): 配置文件无法读取或格式错误
    pub fn from_config_file(
        source: Arc<dyn AnalyticsDataSource>,
        config_path: impl AsRef<Path>,
    ) -> ApiResult<Self> {
        let config = ConfigManager::from_json_file(config_path)?
            .with_env_overrides()
            .load();
        Ok(Self::new(source, config))
    }

    pub fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }

    /// 生成分析报告（使用配置的帕累托窗口）
    ///
    /// # 参数
    /// - now: 查询时刻；None 时取本地当前时间
    ///
    /// # 返回
    /// - Ok(AnalyticsReport)
    /// - Err(ApiError::DataSource): 任一输入读取失败
    pub async fn run_report(&self, now: Option<NaiveDateTime>) -> ApiResult<AnalyticsReport> {
        let window = self.engine.config().pareto_window;
        self.run_report_with_window(window, now).await
    }

    /// 生成分析报告（指定帕累托窗口）
    pub async fn run_report_with_window(
        &self,
        pareto_window: AnalysisWindow,
        now: Option<NaiveDateTime>,
    ) -> ApiResult<AnalyticsReport> {
        let now = now.unwrap_or_else(|| chrono::Local::now().naive_local());

        let (machines, events, work_hours) = futures::try_join!(
            self.source.load_machines(),
            self.source.load_events(),
            self.source.load_work_hours()
        )?;

        info!(
            source = self.source.name(),
            machines_count = machines.len(),
            events_count = events.len(),
            "分析输入读取完成"
        );

        Ok(self
            .engine
            .run_with_window(&machines, &events, &work_hours, pareto_window, now))
    }

    /// 查询单台设备指标
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): machine_id 为空
    /// - Err(ApiError::NotFound): 设备不在快照中
    pub async fn machine_metrics(
        &self,
        machine_id: &str,
        now: Option<NaiveDateTime>,
    ) -> ApiResult<MachineMetrics> {
        if machine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("machine_id 不能为空".to_string()));
        }

        let report = self.run_report(now).await?;
        report
            .metrics
            .into_iter()
            .find(|m| m.machine_id == machine_id)
            .ok_or_else(|| ApiError::NotFound(format!("设备(id={})不存在", machine_id)))
    }
}
