// ==========================================
// 设备停机 OEE 分析引擎 - 引擎编排器
// ==========================================
// 用途: 一次调用内按固定顺序执行全部分析阶段
// 数据流: 事件+快照 → 区间重建 → {指标, 帕累托} → 洞察
// ==========================================
// 红线: 纯计算，不做 I/O，不缓存；now 由调用方显式传入
// ==========================================

use crate::config::AnalyticsConfig;
use crate::domain::downtime::ParetoItem;
use crate::domain::machine::{Machine, StatusChangeEvent};
use crate::domain::metrics::{FleetSummary, Insight, MachineMetrics};
use crate::domain::types::AnalysisWindow;
use crate::domain::work_hours::WorkHoursConfig;
use crate::engine::insight::{summarize_fleet, InsightGenerator};
use crate::engine::interval_reconstructor::{IntervalReconstructor, Reconstruction};
use crate::engine::metrics_calculator::MetricsCalculator;
use crate::engine::pareto::ParetoAnalyzer;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// ==========================================
// ReplayStats - 单次回放诊断
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayStats {
    pub since: Option<NaiveDateTime>,
    pub events_considered: usize,
    pub intervals: usize,
    pub open_intervals: usize,
    pub double_stops: u32,
    pub orphan_resumes: u32,
}

impl ReplayStats {
    fn from_reconstruction(since: Option<NaiveDateTime>, r: &Reconstruction) -> Self {
        Self {
            since,
            events_considered: r.events_considered,
            intervals: r.intervals.len(),
            open_intervals: r.open_intervals().count(),
            double_stops: r.double_stops,
            orphan_resumes: r.orphan_resumes,
        }
    }
}

// ==========================================
// AnalyticsReport - 分析输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub generated_at: NaiveDateTime,
    pub no_data: bool, // 设备快照为空
    pub pareto_window: AnalysisWindow,

    pub metrics: Vec<MachineMetrics>, // 与输入设备同序
    pub pareto: Vec<ParetoItem>,      // 按总时长降序
    pub insights: Vec<Insight>,       // 0-3 条
    pub fleet: FleetSummary,

    // ===== 诊断 =====
    pub reliability_replay: ReplayStats,
    pub pareto_replay: ReplayStats,
    pub work_hours_degraded: bool, // 班次配置非法，已按全天计时
}

impl AnalyticsReport {
    /// 洞察文案
    pub fn insight_messages(&self) -> Vec<&str> {
        self.insights.iter().map(|i| i.message.as_str()).collect()
    }

    /// 按设备ID查找指标
    pub fn metrics_for(&self, machine_id: &str) -> Option<&MachineMetrics> {
        self.metrics.iter().find(|m| m.machine_id == machine_id)
    }
}

// ==========================================
// AnalyticsEngine - 分析引擎
// ==========================================
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    reconstructor: IntervalReconstructor,
    calculator: MetricsCalculator,
    pareto: ParetoAnalyzer,
    insights: InsightGenerator,
}

impl AnalyticsEngine {
    /// 创建新的分析引擎
    ///
    /// # 参数
    /// - config: 引擎参数
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            reconstructor: IntervalReconstructor::new(config.unknown_reason_label.clone()),
            calculator: MetricsCalculator::new(
                config.reliability_window_days,
                config.default_cycle_time_seconds,
            ),
            pareto: ParetoAnalyzer::new(config.unknown_reason_label.clone()),
            insights: InsightGenerator::new(
                config.fleet_oee_alert_pct,
                config.worst_machine_oee_alert_pct,
            ),
            config,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// 使用配置的帕累托窗口执行分析
    pub fn run(
        &self,
        machines: &[Machine],
        events: &[StatusChangeEvent],
        work_hours: &WorkHoursConfig,
        now: NaiveDateTime,
    ) -> AnalyticsReport {
        self.run_with_window(machines, events, work_hours, self.config.pareto_window, now)
    }

    /// 执行完整分析流程
    ///
    /// # 参数
    /// - machines: 设备快照（有序）
    /// - events: 状态事件日志（无序）
    /// - work_hours: 班次配置
    /// - pareto_window: 帕累托统计窗口
    /// - now: 查询时刻
    ///
    /// # 返回
    /// 分析报告；相同输入（含 now）得到相同输出
    pub fn run_with_window(
        &self,
        machines: &[Machine],
        events: &[StatusChangeEvent],
        work_hours: &WorkHoursConfig,
        pareto_window: AnalysisWindow,
        now: NaiveDateTime,
    ) -> AnalyticsReport {
        info!(
            machines_count = machines.len(),
            events_count = events.len(),
            pareto_window = %pareto_window,
            now = %now,
            "开始执行停机分析"
        );

        let work_hours_degraded = work_hours.is_invalid();
        if work_hours_degraded {
            warn!(
                shift_start = %work_hours.shift_start,
                shift_end = %work_hours.shift_end,
                "班次配置非法(下班时刻不晚于上班时刻)，按全天计时"
            );
        }

        // ==========================================
        // 步骤1: 区间重建（可靠性窗口 / 帕累托窗口）
        // ==========================================
        // 超出日期范围时不设下界
        let reliability_since =
            now.checked_sub_signed(Duration::milliseconds(self.calculator.reliability_window_ms()));
        let reliability = self
            .reconstructor
            .reconstruct(events, machines, work_hours, reliability_since, now);

        let pareto_since = pareto_window.lower_bound(now);
        let pareto_reconstruction = if pareto_since == reliability_since {
            None
        } else {
            Some(
                self.reconstructor
                    .reconstruct(events, machines, work_hours, pareto_since, now),
            )
        };
        let pareto_source = pareto_reconstruction.as_ref().unwrap_or(&reliability);

        debug!(
            reliability_intervals = reliability.intervals.len(),
            pareto_intervals = pareto_source.intervals.len(),
            "区间重建完成"
        );

        // ==========================================
        // 步骤2: 指标计算
        // ==========================================
        let no_data = machines.is_empty();
        let metrics = if no_data {
            info!("设备快照为空，返回无数据结果");
            Vec::new()
        } else {
            self.calculator
                .calculate(machines, &reliability.intervals, work_hours, now)
        };

        // ==========================================
        // 步骤3: 帕累托分析
        // ==========================================
        let pareto = self.pareto.analyze(&pareto_source.intervals);

        // ==========================================
        // 步骤4: 洞察
        // ==========================================
        let insights = self.insights.generate(&metrics, &pareto);
        let fleet = summarize_fleet(&metrics);

        info!(
            metrics_count = metrics.len(),
            pareto_reasons = pareto.len(),
            insights_count = insights.len(),
            average_oee = fleet.average_oee,
            "停机分析完成"
        );

        AnalyticsReport {
            generated_at: now,
            no_data,
            pareto_window,
            reliability_replay: ReplayStats::from_reconstruction(reliability_since, &reliability),
            pareto_replay: ReplayStats::from_reconstruction(pareto_since, pareto_source),
            metrics,
            pareto,
            insights,
            fleet,
            work_hours_degraded,
        }
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}
