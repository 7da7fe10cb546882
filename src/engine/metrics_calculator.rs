// ==========================================
// 设备停机 OEE 分析引擎 - 效率指标计算
// ==========================================
// 职责: 单机 Availability / Performance / Quality / OEE 与 MTBF / MTTR
// 输入: 设备快照 + 长窗口停机区间 + 班次配置 + now
// 输出: MachineMetrics (与输入设备同序)
// ==========================================
// 降级规则 (不报错):
// - 节拍缺失/为零 → 缺省节拍
// - 计划时间为 0 → 可用率 0
// - 理论产量为 0 → 性能 0
// - 总产出为 0 → 质量 100
// ==========================================

use crate::domain::downtime::DowntimeInterval;
use crate::domain::machine::Machine;
use crate::domain::metrics::MachineMetrics;
use crate::domain::work_hours::WorkHoursConfig;
use crate::engine::shift_clock;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::debug;

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: i64 = 86_400_000;

// ==========================================
// OeeBreakdown - 未裁剪的 OEE 分量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OeeBreakdown {
    pub availability: f64,
    pub performance: f64, // 可超过 100（实际节拍快于标准节拍）
    pub quality: f64,
    pub oee: f64,
}

impl OeeBreakdown {
    /// 计算 OEE 分量
    ///
    /// # 参数
    /// - `planned_ms`: 计划生产时间
    /// - `run_ms`: 运行时间
    /// - `cycle_time_seconds`: 标准节拍（秒）
    /// - `good_units`: 良品数
    /// - `scrap_units`: 废品数
    pub fn compute(
        planned_ms: i64,
        run_ms: i64,
        cycle_time_seconds: f64,
        good_units: u64,
        scrap_units: u64,
    ) -> Self {
        let availability = if planned_ms > 0 {
            run_ms as f64 / planned_ms as f64 * 100.0
        } else {
            0.0
        };

        let theoretical_max_units = if cycle_time_seconds > 0.0 {
            (run_ms as f64 / 1000.0) / cycle_time_seconds
        } else {
            0.0
        };

        let total_produced = good_units.saturating_add(scrap_units);
        let performance = if theoretical_max_units > 0.0 {
            total_produced as f64 / theoretical_max_units * 100.0
        } else {
            0.0
        };

        let quality = if total_produced > 0 {
            good_units as f64 / total_produced as f64 * 100.0
        } else {
            100.0
        };

        let oee = availability / 100.0 * (performance / 100.0) * (quality / 100.0) * 100.0;

        Self {
            availability,
            performance,
            quality,
            oee,
        }
    }
}

// ==========================================
// MetricsCalculator - 指标计算器
// ==========================================
pub struct MetricsCalculator {
    reliability_window_ms: i64,
    default_cycle_time_seconds: f64,
}

impl MetricsCalculator {
    /// 构造函数
    ///
    /// # 参数
    /// - `reliability_window_days`: MTBF/MTTR 统计窗口（天）
    /// - `default_cycle_time_seconds`: 节拍缺省值（秒）
    pub fn new(reliability_window_days: u32, default_cycle_time_seconds: f64) -> Self {
        Self {
            reliability_window_ms: i64::from(reliability_window_days) * MS_PER_DAY,
            default_cycle_time_seconds,
        }
    }

    pub fn reliability_window_ms(&self) -> i64 {
        self.reliability_window_ms
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算全部设备指标
    ///
    /// # 参数
    /// - `machines`: 设备快照
    /// - `reliability_intervals`: 可靠性窗口内重建的停机区间
    /// - `work_hours`: 班次配置
    /// - `now`: 查询时刻
    ///
    /// # 返回
    /// 每台设备一条，顺序与输入一致；输入为空时返回空列表
    pub fn calculate(
        &self,
        machines: &[Machine],
        reliability_intervals: &[DowntimeInterval],
        work_hours: &WorkHoursConfig,
        now: NaiveDateTime,
    ) -> Vec<MachineMetrics> {
        // 按设备聚合 (次数, 总时长)
        let mut per_machine: HashMap<&str, (u32, i64)> = HashMap::new();
        for interval in reliability_intervals {
            let entry = per_machine.entry(interval.machine_id.as_str()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += interval.duration_ms.max(0);
        }

        let planned_ms = shift_clock::elapsed_shift_time_today(work_hours, now);

        machines
            .iter()
            .map(|machine| {
                let (failure_count, total_downtime_ms) = per_machine
                    .get(machine.id.as_str())
                    .copied()
                    .unwrap_or((0, 0));
                self.calculate_machine(machine, failure_count, total_downtime_ms, planned_ms, work_hours, now)
            })
            .collect()
    }

    /// 计算单机指标
    pub fn calculate_machine(
        &self,
        machine: &Machine,
        failure_count: u32,
        total_downtime_ms: i64,
        planned_ms: i64,
        work_hours: &WorkHoursConfig,
        now: NaiveDateTime,
    ) -> MachineMetrics {
        // 1. 长窗口可靠性
        let (mtbf_hours, mttr_minutes) = self.reliability(failure_count, total_downtime_ms);

        // 2. 当日停机 = 已关闭累计 + 进行中（班次裁剪）
        let live_ms = if machine.is_stopped() {
            shift_clock::active_downtime(machine.last_status_change, work_hours, now)
        } else {
            0
        };
        let downtime_today_ms = machine.accumulated_downtime_ms.max(0) + live_ms;
        let run_time_ms = (planned_ms - downtime_today_ms).max(0);

        // 3. OEE 分量
        let cycle_time_seconds = machine.cycle_time_seconds(self.default_cycle_time_seconds);
        let breakdown = OeeBreakdown::compute(
            planned_ms,
            run_time_ms,
            cycle_time_seconds,
            machine.production_count,
            machine.scrap_count,
        );

        debug!(
            machine_id = %machine.id,
            planned_ms,
            downtime_today_ms,
            run_time_ms,
            cycle_time_seconds,
            failure_count,
            raw_oee = breakdown.oee,
            "单机指标计算完成"
        );

        MachineMetrics {
            machine_id: machine.id.clone(),
            machine_name: machine.name.clone(),
            planned_time_ms: planned_ms,
            downtime_today_ms,
            run_time_ms,
            is_stopped: machine.is_stopped(),
            failure_count,
            mtbf_hours,
            mttr_minutes,
            availability: round1(clamp_pct(breakdown.availability)),
            performance: round1(clamp_pct(breakdown.performance)),
            quality: round1(clamp_pct(breakdown.quality)),
            oee: round1(clamp_pct(breakdown.oee)),
        }
    }

    /// MTBF（小时，一位小数）与 MTTR（分钟，取整）
    ///
    /// 无故障时 MTBF 为整个窗口长度，MTTR 为 0。
    pub fn reliability(&self, failure_count: u32, total_downtime_ms: i64) -> (f64, f64) {
        if failure_count == 0 {
            return (round1(self.reliability_window_ms as f64 / MS_PER_HOUR), 0.0);
        }

        let failures = f64::from(failure_count);
        let total = total_downtime_ms.max(0) as f64;
        let uptime = (self.reliability_window_ms as f64 - total).max(0.0);

        let mtbf_hours = round1(uptime / failures / MS_PER_HOUR);
        let mttr_minutes = (total / failures / MS_PER_MINUTE).round();
        (mtbf_hours, mttr_minutes)
    }
}

/// 裁剪到 [0, 100]，非有限值视为 0
pub fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// 保留一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
