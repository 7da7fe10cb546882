// ==========================================
// 设备停机 OEE 分析引擎 - 洞察生成
// ==========================================
// 职责: 把指标与帕累托结果转成简短文字提示
// 规则顺序固定: 全厂 OEE → 最差设备 → 首要停机原因
// 每条规则至多输出一条
// ==========================================

use crate::domain::downtime::ParetoItem;
use crate::domain::metrics::{FleetSummary, Insight, MachineMetrics};
use crate::domain::types::InsightKind;
use crate::engine::metrics_calculator::round1;
use crate::i18n::t_with_args;

// ==========================================
// InsightGenerator - 洞察生成器
// ==========================================
pub struct InsightGenerator {
    fleet_oee_alert_pct: f64,
    worst_machine_oee_alert_pct: f64,
}

impl InsightGenerator {
    /// 构造函数
    ///
    /// # 参数
    /// - `fleet_oee_alert_pct`: 全厂平均 OEE 告警阈值（默认 60）
    /// - `worst_machine_oee_alert_pct`: 单机 OEE 告警阈值（默认 70）
    pub fn new(fleet_oee_alert_pct: f64, worst_machine_oee_alert_pct: f64) -> Self {
        Self {
            fleet_oee_alert_pct,
            worst_machine_oee_alert_pct,
        }
    }

    /// 生成洞察（0-3 条）
    pub fn generate(&self, metrics: &[MachineMetrics], pareto: &[ParetoItem]) -> Vec<Insight> {
        let mut insights = Vec::new();

        // 规则1: 全厂平均 OEE 偏低
        // 用未取整均值比较，取整仅用于展示
        if let Some(mean_oee) = mean(metrics, |m| m.oee) {
            if mean_oee < self.fleet_oee_alert_pct {
                let oee = format!("{:.1}", round1(mean_oee));
                let threshold = format!("{:.0}", self.fleet_oee_alert_pct);
                insights.push(Insight {
                    kind: InsightKind::FleetOeeLow,
                    message: t_with_args(
                        "insight.fleet_oee_low",
                        &[("oee", oee.as_str()), ("threshold", threshold.as_str())],
                    ),
                });
            }
        }

        // 规则2: 最差设备（并列取先出现者）
        if let Some(worst) = worst_performer(metrics) {
            if worst.oee < self.worst_machine_oee_alert_pct {
                let oee = format!("{:.1}", worst.oee);
                insights.push(Insight {
                    kind: InsightKind::WorstMachine,
                    message: t_with_args(
                        "insight.worst_machine",
                        &[("machine", worst.machine_name.as_str()), ("oee", oee.as_str())],
                    ),
                });
            }
        }

        // 规则3: 首要停机原因
        if let Some(top) = pareto.first() {
            let duration = format_duration_ms(top.total_duration_ms);
            let percent = format!("{:.0}", top.percentage);
            let count = top.count.to_string();
            insights.push(Insight {
                kind: InsightKind::TopCause,
                message: t_with_args(
                    "insight.top_cause",
                    &[
                        ("reason", top.reason.as_str()),
                        ("duration", duration.as_str()),
                        ("percent", percent.as_str()),
                        ("count", count.as_str()),
                    ],
                ),
            });
        }

        insights
    }
}

/// OEE 最低的设备，并列时取输入顺序中靠前者
pub fn worst_performer(metrics: &[MachineMetrics]) -> Option<&MachineMetrics> {
    let mut worst: Option<&MachineMetrics> = None;
    for m in metrics {
        match worst {
            Some(current) if m.oee >= current.oee => {}
            _ => worst = Some(m),
        }
    }
    worst
}

/// 全厂汇总
pub fn summarize_fleet(metrics: &[MachineMetrics]) -> FleetSummary {
    if metrics.is_empty() {
        return FleetSummary::default();
    }

    let avg = |f: fn(&MachineMetrics) -> f64| mean(metrics, f).map_or(0.0, round1);

    FleetSummary {
        machine_count: metrics.len(),
        stopped_count: metrics.iter().filter(|m| m.is_stopped).count(),
        total_downtime_today_ms: metrics.iter().map(|m| m.downtime_today_ms).sum(),
        average_availability: avg(|m| m.availability),
        average_performance: avg(|m| m.performance),
        average_quality: avg(|m| m.quality),
        average_oee: avg(|m| m.oee),
    }
}

fn mean(metrics: &[MachineMetrics], f: fn(&MachineMetrics) -> f64) -> Option<f64> {
    if metrics.is_empty() {
        return None;
    }
    Some(metrics.iter().map(f).sum::<f64>() / metrics.len() as f64)
}

/// 时长格式化: "1h 05m" / "12m" / "45s"
pub fn format_duration_ms(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(name: &str, oee: f64) -> MachineMetrics {
        MachineMetrics {
            machine_id: name.to_string(),
            machine_name: name.to_string(),
            planned_time_ms: 0,
            downtime_today_ms: 0,
            run_time_ms: 0,
            is_stopped: false,
            failure_count: 0,
            mtbf_hours: 720.0,
            mttr_minutes: 0.0,
            availability: 100.0,
            performance: oee,
            quality: 100.0,
            oee,
        }
    }

    fn pareto(reason: &str) -> ParetoItem {
        ParetoItem {
            reason: reason.to_string(),
            count: 2,
            total_duration_ms: 65 * 60_000,
            percentage: 100.0,
            cumulative_percent: 100,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(65 * 60_000), "1h 05m");
        assert_eq!(format_duration_ms(12 * 60_000 + 5_000), "12m");
        assert_eq!(format_duration_ms(45_000), "45s");
        assert_eq!(format_duration_ms(-1), "0s");
    }

    #[test]
    fn test_all_rules_fire_in_fixed_order() {
        let gen = InsightGenerator::new(60.0, 70.0);
        let out = gen.generate(&[metrics("Press 1", 50.0), metrics("Lathe", 40.0)], &[pareto("Jam")]);

        let kinds: Vec<InsightKind> = out.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![InsightKind::FleetOeeLow, InsightKind::WorstMachine, InsightKind::TopCause]
        );
        assert!(out[0].message.contains("45.0"));
        assert!(out[1].message.contains("Lathe"));
        assert!(out[2].message.contains("Jam"));
    }

    #[test]
    fn test_healthy_fleet_without_downtime_is_silent() {
        let gen = InsightGenerator::new(60.0, 70.0);
        assert!(gen.generate(&[metrics("A", 85.0), metrics("B", 75.0)], &[]).is_empty());
    }

    #[test]
    fn test_fleet_rule_uses_unrounded_mean() {
        // 均值 59.96，取整后为 60.0
        let gen = InsightGenerator::new(60.0, 0.0);
        let out = gen.generate(&[metrics("A", 59.92), metrics("B", 60.0)], &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, InsightKind::FleetOeeLow);
        assert_eq!(summarize_fleet(&[metrics("A", 59.92), metrics("B", 60.0)]).average_oee, 60.0);
    }

    #[test]
    fn test_worst_performer_tie_keeps_first() {
        let list = vec![metrics("A", 50.0), metrics("B", 50.0)];
        assert_eq!(worst_performer(&list).map(|m| m.machine_id.as_str()), Some("A"));
        assert!(worst_performer(&[]).is_none());
    }

    #[test]
    fn test_summarize_fleet_averages() {
        let fleet = summarize_fleet(&[metrics("A", 80.0), metrics("B", 61.0)]);
        assert_eq!(fleet.machine_count, 2);
        assert_eq!(fleet.average_oee, 70.5);
        assert_eq!(summarize_fleet(&[]), FleetSummary::default());
    }
}
